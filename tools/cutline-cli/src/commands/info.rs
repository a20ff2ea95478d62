//! Show project information.

use std::path::PathBuf;

use cutline_processing_core::resolve_at;

pub fn run(path: PathBuf, at: Option<f64>) -> anyhow::Result<()> {
    let project = super::load_project(&path)?;

    let p = &project.project;
    let timeline = &project.timeline;

    println!("Project: {}", p.name);
    println!("  ID: {}", p.id);
    println!("  Created: {}", p.created_at);
    println!("  Modified: {}", p.modified_at);
    println!();

    println!("Source:");
    if p.source.path.is_empty() {
        println!("  Path: (not attached)");
    } else {
        println!("  Path: {}", p.source.path);
    }
    println!("  Duration: {:.2}s", p.source.duration_secs);
    println!();

    println!("Timeline:");
    println!("  Clips: {}", timeline.clips.len());
    println!("  Edited length: {:.2}s", timeline.total_duration());
    println!("  Default preset: {}", timeline.selected_preset_id);
    println!("  Loop selected clip: {}", timeline.loop_selected_clip);
    for (i, clip) in timeline.clips.iter().enumerate() {
        let selected = if timeline.selected_clip_id.as_deref() == Some(clip.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            " {selected}{:>3}. {:<20} [{:>7.2}, {:>7.2})  {:.2}x  zoom {:.2}  preset {}  keyframes {}",
            i + 1,
            clip.name,
            clip.start,
            clip.end,
            clip.speed,
            clip.zoom,
            clip.preset_id,
            clip.keyframes.len()
        );
    }

    if let Some(time) = at {
        println!();
        match resolve_at(timeline, time) {
            Some(frame) => {
                let t = &frame.transform;
                println!("Frame at {time:.2}s:");
                println!(
                    "  Clip #{} ({}), source {:.2}s",
                    frame.clip_index + 1,
                    frame.clip_id,
                    frame.source_time
                );
                println!(
                    "  Zoom {:.2}  Rotate {:.1}  Pan ({:.1}, {:.1})  Opacity {:.2}",
                    t.zoom, t.rotate, t.pan_x, t.pan_y, t.opacity
                );
                println!(
                    "  Crop x={:.1} y={:.1} w={:.1} h={:.1}{}",
                    t.crop.x,
                    t.crop.y,
                    t.crop.width,
                    t.crop.height,
                    if frame.muted { "  (muted)" } else { "" }
                );
            }
            None => println!("Frame at {time:.2}s: past the end of the edit"),
        }
    }

    Ok(())
}
