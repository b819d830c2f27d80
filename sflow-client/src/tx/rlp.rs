// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Recursive length prefix encoding, the canonical form signed
//! transactions are hashed in.

/// An RLP item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rlp {
    /// A byte string
    Bytes(Vec<u8>),
    /// A list of items
    List(Vec<Rlp>),
}

impl Rlp {
    /// An unsigned integer, big endian without leading zeros
    pub fn uint(value: u64) -> Self {
        let bytes = value.to_be_bytes();
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self::Bytes(bytes[first..].to_vec())
    }

    /// A byte string
    pub fn bytes<B: AsRef<[u8]>>(bytes: B) -> Self {
        Self::Bytes(bytes.as_ref().to_vec())
    }

    /// Returns the encoded item
    pub fn encode(&self) -> Vec<u8> {
        let mut out = vec![];
        self.encode_to(&mut out);
        out
    }

    fn encode_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bytes(bytes) if bytes.len() == 1 && bytes[0] < 0x80 => {
                out.push(bytes[0])
            }
            Self::Bytes(bytes) => {
                write_header(out, 0x80, bytes.len());
                out.extend_from_slice(bytes);
            }
            Self::List(items) => {
                let mut body = vec![];
                for item in items {
                    item.encode_to(&mut body);
                }
                write_header(out, 0xc0, body.len());
                out.extend_from_slice(&body);
            }
        }
    }
}

fn write_header(out: &mut Vec<u8>, offset: u8, len: usize) {
    if len <= 55 {
        out.push(offset + len as u8);
    } else {
        let len = (len as u64).to_be_bytes();
        let first = len.iter().position(|b| *b != 0).unwrap_or(len.len());
        let len = &len[first..];
        out.push(offset + 55 + len.len() as u8);
        out.extend_from_slice(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings() {
        assert_eq!(Rlp::bytes("dog").encode(), [0x83, b'd', b'o', b'g']);
        assert_eq!(Rlp::bytes("").encode(), [0x80]);
        assert_eq!(Rlp::bytes([0x0f]).encode(), [0x0f]);
        assert_eq!(Rlp::bytes([0x80]).encode(), [0x81, 0x80]);

        let long = "Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        let encoded = Rlp::bytes(long).encode();
        assert_eq!(&encoded[..2], [0xb8, 0x38]);
        assert_eq!(&encoded[2..], long.as_bytes());
    }

    #[test]
    fn integers() {
        assert_eq!(Rlp::uint(0).encode(), [0x80]);
        assert_eq!(Rlp::uint(15).encode(), [0x0f]);
        assert_eq!(Rlp::uint(1024).encode(), [0x82, 0x04, 0x00]);
        assert_eq!(Rlp::uint(9999).encode(), [0x82, 0x27, 0x0f]);
    }

    #[test]
    fn lists() {
        assert_eq!(Rlp::List(vec![]).encode(), [0xc0]);
        assert_eq!(
            Rlp::List(vec![Rlp::bytes("cat"), Rlp::bytes("dog")]).encode(),
            [0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g']
        );
        // [ [], [[]], [ [], [[]] ] ]
        let empty = || Rlp::List(vec![]);
        let set = Rlp::List(vec![
            empty(),
            Rlp::List(vec![empty()]),
            Rlp::List(vec![empty(), Rlp::List(vec![empty()])]),
        ]);
        assert_eq!(
            set.encode(),
            [0xc7, 0xc0, 0xc1, 0xc0, 0xc3, 0xc0, 0xc1, 0xc0]
        );

        let long = Rlp::List(vec![Rlp::bytes([0xaa; 60])]);
        let encoded = long.encode();
        assert_eq!(&encoded[..3], [0xf8, 62, 0xb8]);
    }
}
