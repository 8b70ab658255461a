//! Fuzz target for the HTTP request decoder and API driver
//!
//! Prevent crashes and silent mutation on hostile input
//!
//! # Strategy
//!
//! - Arbitrary byte streams, fed in arbitrary chunk sizes
//! - Every decoded request is handed to the driver
//!
//! # Invariants
//!
//! - NEVER panic on any input
//! - Decoding stops at the first framing error
//! - A request that gets a non-200 answer leaves the list unchanged
//! - The snapshot is well formed after every request

#![no_main]

use arbitrary::Arbitrary;
use bytes::BytesMut;
use chainlist_core::LinkedList;
use chainlist_proto::links_are_well_formed;
use chainlist_server::{
    ApiDriver,
    http::{decode_request, StatusCode},
};
use libfuzzer_sys::fuzz_target;

const MAX_BODY: usize = 4096;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    /// Sizes of successive reads; cycled over the payload.
    chunks: Vec<u8>,
    payload: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let mut driver = ApiDriver::new(LinkedList::from_values([1, 2, 3]));
    let mut buf = BytesMut::new();
    let mut offset = 0;
    let mut chunk_sizes = input.chunks.iter().map(|&c| usize::from(c).max(1)).cycle();

    while offset < input.payload.len() {
        let size = chunk_sizes.next().unwrap_or(input.payload.len());
        let end = (offset + size).min(input.payload.len());
        buf.extend_from_slice(&input.payload[offset..end]);
        offset = end;

        loop {
            match decode_request(&mut buf, MAX_BODY) {
                Ok(Some(request)) => {
                    let before = driver.list().snapshot();
                    let response = driver.handle(&request);
                    if response.status != StatusCode::Ok {
                        assert_eq!(driver.list().snapshot(), before, "failed request mutated list");
                    }
                    assert!(links_are_well_formed(&driver.list().snapshot()));
                },
                Ok(None) => break,
                Err(_) => return,
            }
        }
    }
});
