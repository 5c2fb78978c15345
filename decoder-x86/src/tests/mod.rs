#![cfg(test)]

mod decode;
mod opcode;

use std::fmt::Write;

use decoder::{Decodable, ErrorKind, Reader};

use crate::{Decoder, Instruction};

fn hex(data: &[u8]) -> String {
    let mut hex = String::new();
    for b in data {
        write!(hex, "{:02x}", b).unwrap();
    }
    hex
}

fn test_invalid(data: &[u8]) {
    test_invalid_under(&Decoder::default(), data);
}

fn test_invalid_under(decoder: &Decoder, data: &[u8]) {
    let mut reader = Reader::new(data);
    match decoder.decode(&mut reader) {
        Ok((inst, _)) => panic!(
            "decoded {:?} from {} under decoder {}",
            inst.opcode(),
            hex(data),
            decoder
        ),
        Err(err) => assert_eq!(
            err.kind,
            ErrorKind::UnrecognizedOpcode,
            "wrong error for {}",
            hex(data)
        ),
    }
}

fn test_decode(data: &[u8], expected: Instruction) {
    test_decode_under(&Decoder::default(), data, expected);
}

fn test_decode_under(decoder: &Decoder, data: &[u8], expected: Instruction) {
    let mut reader = Reader::new(data);
    match decoder.decode(&mut reader) {
        Ok((inst, width)) => {
            assert!(
                inst == expected,
                "decode error for {}:\n  decoded: {:?} under decoder {}\n expected: {:?}\n",
                hex(data),
                inst,
                decoder,
                expected
            );
            // while we're at it, test that the instruction is as long, and no longer, than its
            // input
            assert_eq!(
                width,
                data.len(),
                "instruction length is incorrect, wanted instruction {:?}",
                expected
            );
            assert_eq!(reader.offset(), 0, "decoded instruction wasn't committed");
        }
        Err(err) => panic!(
            "decode error ({}) for {} under decoder {}:\n  expected: {:?}\n",
            err,
            hex(data),
            decoder,
            expected
        ),
    }
}
