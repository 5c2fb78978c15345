use std::path::Path;

use args::ARGS;
use assembler::Builder;
use config::{Config, CONFIG};
use decoder::{encode_hex_bytes_truncated, Decodable};
use object::{Architecture, Object, ObjectSection, SectionKind};
use x86::{Decoder, Stream};

#[macro_export]
macro_rules! exit {
    () => {{
        std::process::exit(0);
    }};

    ($($arg:tt)*) => {{
        eprintln!($($arg)*);
        std::process::exit(1);
    }};
}

/// A run of machine code and where it would be mapped.
struct Section {
    name: String,
    address: u64,
    bytes: Vec<u8>,
}

fn read_hex(hex: &[String]) -> Result<Vec<Section>, String> {
    let bytes = decoder::decode_hex(&hex.join(" ")).ok_or("Input isn't valid hex.")?;

    Ok(vec![Section {
        name: "hex".to_string(),
        address: 0,
        bytes,
    }])
}

/// The text sections of an object, or the whole file if it isn't one.
fn read_file(path: &Path) -> Result<Vec<Section>, String> {
    let binary = std::fs::read(path).map_err(|err| format!("Failed to read {path:?}: {err}."))?;

    if let Ok(obj) = object::File::parse(&binary[..]) {
        if obj.architecture() != Architecture::I386 {
            return Err(format!("Expected an x86 object, found {:?}.", obj.architecture()));
        }

        return obj
            .sections()
            .filter(|s| s.kind() == SectionKind::Text)
            .map(|section| -> Result<Section, String> {
                let bytes = section
                    .uncompressed_data()
                    .map_err(|_| "Failed to decompress text section.")?;

                Ok(Section {
                    name: section.name().unwrap_or("unnamed").to_string(),
                    address: section.address(),
                    bytes: bytes.into_owned(),
                })
            })
            .collect();
    }

    log::trace!("{path:?} isn't an object, decoding it as raw bytes.");
    Ok(vec![Section {
        name: "raw".to_string(),
        address: 0,
        bytes: binary,
    }])
}

fn main() {
    let explicit;
    let config = match ARGS.config {
        Some(ref path) => {
            explicit = Config::load(path);
            &explicit
        }
        None => &*CONFIG,
    };

    log::set_echo(config.log.echo);

    let decoder = Decoder::with_extensions(config.decoder.extensions);
    log::trace!("decoding with {decoder}.");

    let sections = match ARGS.file {
        Some(ref path) => read_file(path),
        None => read_hex(&ARGS.hex),
    };

    let sections = match sections {
        Ok(sections) => sections,
        Err(err) => exit!("{err}"),
    };

    let column = decoder.max_width() * 3;
    let mut builder = Builder::new();
    let mut skipped = 0;

    for section in sections {
        if ARGS.file.is_some() {
            println!("{}:", section.name);
        }

        let mut stream = Stream::new(decoder, &section.bytes[..]);
        loop {
            match stream.next() {
                Some(Ok(decoded)) => {
                    let bytes = &section.bytes[decoded.offset..][..decoded.width];
                    println!(
                        "{:>8x}:  {}{:?}",
                        section.address + decoded.offset as u64,
                        encode_hex_bytes_truncated(bytes, column),
                        decoded.instruction
                    );
                    builder.instruction(decoded.instruction);
                }
                Some(Err(err)) => {
                    let offset = stream.offset();
                    let Some(byte) = stream.resync() else { break };
                    let addr = section.address + offset as u64;

                    println!(
                        "{addr:>8x}:  {}<{err}>",
                        encode_hex_bytes_truncated(&[byte], column)
                    );
                    builder.comment(format!("{addr:#x}: {err}"));
                    skipped += 1;
                }
                None => break,
            }
        }
    }

    let assembly = builder.to_assembly();
    log::notify!(
        "decoded {} instructions, skipped {skipped} bytes.",
        assembly.instructions().count()
    );

    let mut failed = false;
    if ARGS.validate || config.validate {
        if let Err(errors) = assembler::validate_assembly(&assembly) {
            for (idx, err) in errors {
                eprintln!("element {idx}: {err}");
            }
            failed = true;
        }
    }

    if ARGS.debug {
        eprint!("{}", log::tail(config.log.lines));
    }

    if failed {
        std::process::exit(1);
    }
}
