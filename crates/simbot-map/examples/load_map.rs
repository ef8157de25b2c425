use simbot_map::{GridTransform, MapModel, MapStyle, Shape};

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "maps/2024_map.txt".to_string());

    // 2 ft tiles at 60 px per foot
    let transform = GridTransform::from_board(60.0, 2.0);
    let style = MapStyle::default();

    match MapModel::load(&path, &transform, &style) {
        Ok(model) => {
            println!("Loaded {} primitives from {}", model.len(), path);
            for primitive in model.draw_order() {
                match primitive.shape {
                    Shape::Segment { start, end, width } => println!(
                        "  {:?} segment ({:.1}, {:.1}) -> ({:.1}, {:.1}) width {}",
                        primitive.kind, start.x, start.y, end.x, end.y, width
                    ),
                    Shape::Rect { origin, width, height } => println!(
                        "  {:?} rect at ({:.1}, {:.1}) size {}x{}",
                        primitive.kind, origin.x, origin.y, width, height
                    ),
                }
            }
            match model.initial_pose() {
                Some(pose) => println!("Robot spawns at {}", pose),
                None => println!("Map has no robot"),
            }
        }
        Err(e) => eprintln!("Failed to load map: {}", e),
    }
}
