use macroquad::prelude::*;
use macroquad_tiled_scene::Map;
use tracing_subscriber::EnvFilter;

fn window_conf() -> Conf {
    Conf {
        window_title: "Basic Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        tracing::error!("{err:#}");
    }
}

async fn run() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/map.json".to_owned());
    let mut map = Map::load(&path)?;
    let texture = map
        .upload_texture()
        .ok_or_else(|| anyhow::anyhow!("{path} has no tileset image"))?;

    let mut camera = Vec2::ZERO;

    loop {
        clear_background(BLACK);

        if is_key_down(KeyCode::Left) {
            camera.x += 2.0;
        }
        if is_key_down(KeyCode::Right) {
            camera.x -= 2.0;
        }

        map.draw(&texture, camera)?;

        draw_text(
            &format!("FPS: {}", get_fps()),
            screen_width() - 135.0,
            55.0,
            30.0,
            RED,
        );

        next_frame().await;
    }
}
