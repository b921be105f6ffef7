use anm2d::{Action, FrameData, SpritePayload};
use std::{env, fs, path::Path, process};

fn usage() -> ! {
    eprintln!("Usage:\n  decode_dump <file.anm> [--actions]\n");
    process::exit(2);
}

fn payload_name(payload: &SpritePayload) -> &'static str {
    match payload {
        SpritePayload::Single { .. } => "single",
        SpritePayload::SingleNoAction { .. } => "single-no-action",
        SpritePayload::SingleFrame { .. } => "single-frame",
        SpritePayload::Frames { .. } => "frames",
    }
}

fn frame_data_name(data: &FrameData) -> &'static str {
    match data {
        FrameData::Bytes(_) => "bytes",
        FrameData::Shorts(_) => "shorts",
        FrameData::Ints(_) => "ints",
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::GoTo { .. } => "go-to",
        Action::GoToStatic => "go-to-static",
        Action::RunScript { .. } => "run-script",
        Action::GoToRandom { .. } => "go-to-random",
        Action::Hit => "hit",
        Action::Delete => "delete",
        Action::End => "end",
        Action::GoToIfPrevious { .. } => "go-to-if-previous",
        Action::AddParticle { .. } => "add-particle",
        Action::SetRadius { .. } => "set-radius",
    }
}

fn main() {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() || args.len() > 2 {
        usage();
    }
    let dump_actions = match args.get(1).map(String::as_str) {
        None => false,
        Some("--actions") => true,
        Some(_) => usage(),
    };

    let path = Path::new(&args[0]);
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("failed to read {}: {e}", path.display());
        process::exit(2);
    });
    let animation = anm2d::decode(&bytes).unwrap_or_else(|e| {
        eprintln!("failed to decode {}: {e}", path.display());
        process::exit(2);
    });

    println!(
        "version 0x{:02x}, {} fps, texture {:?}",
        animation.version,
        animation.frame_rate,
        animation.texture.as_ref().map(|t| t.name.as_str())
    );
    if let Some(index) = &animation.index {
        println!(
            "index: scale {:?}, radius {:?}, {} sibling file(s), {} height(s)",
            index.scale,
            index.render_radius,
            index.file_names.len(),
            index.heights.len()
        );
    }
    println!("{} shape(s)", animation.shapes.len());
    for shape in &animation.shapes {
        println!(
            "  shape {:5}  {}x{} at ({}, {})",
            shape.id, shape.width, shape.height, shape.offset_x, shape.offset_y
        );
    }
    println!("{} sprite(s)", animation.sprites.len());
    for sprite in &animation.sprites {
        println!(
            "  sprite {:5}  {:16} {:7} frame(s)  fd={}  {}",
            sprite.id,
            payload_name(&sprite.payload),
            sprite.frame_count(),
            frame_data_name(&sprite.frame_data),
            sprite.name.as_deref().unwrap_or("-")
        );
    }
    if let Some(table) = &animation.transform {
        println!(
            "transform table: {} color / {} rotation / {} translation float(s), {} action(s)",
            table.colors.len(),
            table.rotations.len(),
            table.translations.len(),
            table.actions.len()
        );
        if dump_actions {
            for action in &table.actions {
                println!("  action {:18} {:?}", action_name(action), action);
            }
        }
    }
    println!("{} import(s)", animation.imports.len());
}
