use anm2d_render::{AnimationRenderer, AnimationType, AssetRoot};
use std::{env, fs, path::PathBuf, process, str::FromStr};

fn usage() -> ! {
    eprintln!(
        "Usage:\n  render_still <game-root> <type> <id> [--frame <n>] [--out <file.png>] [--video <file.webm>]\n"
    );
    process::exit(2);
}

fn main() {
    let mut args = env::args().skip(1).collect::<Vec<_>>();
    if args.len() < 3 {
        usage();
    }

    let root = AssetRoot::new(&args[0]);
    let ty = AnimationType::from_str(&args[1]).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(2);
    });
    let id = args[2].clone();
    args.drain(0..3);

    let mut frame: usize = 0;
    let mut out = PathBuf::from(format!("{id}.png"));
    let mut video: Option<PathBuf> = None;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--frame" if i + 1 < args.len() => {
                frame = args[i + 1].parse().unwrap_or(0);
                i += 2;
            }
            "--out" if i + 1 < args.len() => {
                out = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--video" if i + 1 < args.len() => {
                video = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            _ => usage(),
        }
    }

    let renderer = AnimationRenderer::load(&root, ty, &id).unwrap_or_else(|e| {
        eprintln!("failed to load {ty}/{id}: {e}");
        process::exit(2);
    });

    let sprite_ref = renderer.find_static_sprite().unwrap_or_else(|e| {
        eprintln!("{ty}/{id}: {e}");
        process::exit(if e.is_not_found() { 1 } else { 2 });
    });
    println!(
        "static sprite index {} (child {:?}), {} frame(s)",
        sprite_ref.sprite_index,
        sprite_ref.reference,
        renderer.frame_count(&sprite_ref)
    );

    let png = renderer.render_frame(&sprite_ref, frame).unwrap_or_else(|e| {
        eprintln!("render failed: {e}");
        process::exit(2);
    });
    fs::write(&out, png).unwrap_or_else(|e| {
        eprintln!("failed to write {}: {e}", out.display());
        process::exit(2);
    });
    println!("wrote {}", out.display());

    if let Some(video_path) = video {
        let bytes = renderer.render_video(&sprite_ref).unwrap_or_else(|e| {
            eprintln!("video render failed: {e}");
            process::exit(2);
        });
        fs::write(&video_path, bytes).unwrap_or_else(|e| {
            eprintln!("failed to write {}: {e}", video_path.display());
            process::exit(2);
        });
        println!("wrote {}", video_path.display());
    }
}
