//! A small RFC 8949 CBOR codec.
//!
//! Encoding is driven by the [`encode::ToCbor`] trait and the [`encode::Encoder`]
//! builder, decoding by [`decode::FromCbor`] and the callback based
//! [`decode::parse_value`] family of functions, which hand out borrowed
//! [`decode::Value`]s and cursors over arrays and maps.
//!
//! Decoding never panics on malformed input. A truncated but otherwise valid
//! prefix is reported as [`decode::Error::NeedMoreData`], which lets stream
//! framing wait for more bytes instead of failing.

pub mod decode;
pub mod encode;

mod decode_seq;

#[cfg(test)]
mod decode_tests;
