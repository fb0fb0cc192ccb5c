use std::{env, fs, process};

use nbt::{CompressionMode, Error};

fn main() {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: nbtdump <file> [gzip|zlib|raw|auto]");
        process::exit(2);
    };
    let mode = match args.next().as_deref() {
        Some("gzip") => CompressionMode::Gzip,
        Some("zlib") => CompressionMode::Zlib,
        Some("raw") => CompressionMode::Raw,
        Some("auto") | None => CompressionMode::Auto,
        Some(other) => {
            eprintln!("unknown compression mode: {other}");
            process::exit(2);
        }
    };

    if let Err(err) = dump(&path, mode) {
        eprintln!("{path}: {err}");
        process::exit(1);
    }
}

fn dump(path: &str, mode: CompressionMode) -> Result<(), Error> {
    let bytes = fs::read(path)?;
    let root = nbt::from_slice(&bytes, mode)?;
    println!("{:#?}", root);
    Ok(())
}
