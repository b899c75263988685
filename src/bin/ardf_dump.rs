//! Diagnostic: dump the structure of an ARDF file.

use anyhow::{bail, Context, Result};

use ardfrust::{decode, parse_container};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: ardf_dump <file.ARDF> [--full]");
    };
    let full = args.any(|a| a == "--full");

    let structure =
        parse_container(&path).with_context(|| format!("failed to parse '{path}'"))?;

    println!("images: {}", structure.images.len());
    for image in &structure.images {
        println!(
            "  {:<24} {} x {}",
            image.title(),
            image.def.lines,
            image.def.points
        );
    }

    println!("volumes: {}", structure.volumes.len());
    for volume in &structure.volumes {
        println!(
            "  {:<24} {} x {}  scan_down={}  trace_first={}",
            volume.def.title,
            volume.def.lines,
            volume.def.points,
            volume.scan_down,
            volume.trace_first
        );
        for channel in &volume.channels {
            println!("    channel: {channel}");
        }
    }

    println!("metadata entries: {}", structure.notes.len());
    for (key, value) in &structure.notes {
        println!("  {key}: {value}");
    }

    for notification in &structure.notifications {
        eprintln!("note: {notification}");
    }

    if full {
        let converted = decode(&path).with_context(|| format!("failed to decode '{path}'"))?;
        println!("decoded channels:");
        for (name, attrs) in &converted.attributes {
            if let Some(shape) = &attrs.shape {
                println!("  {name:<24} image {shape:?}");
            } else {
                println!(
                    "  {name:<24} volume trace {:?} retrace {:?}",
                    attrs.trace_shape.as_deref().unwrap_or_default(),
                    attrs.retrace_shape.as_deref().unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}
