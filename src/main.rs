//! Asteroids entry point
//!
//! Loads settings, builds the sprite set and runs the game loop against a
//! headless presenter that plays a scripted demo session.
//!
//! Usage: `asteroids [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::Duration;

    use asteroids::assets::{AlphaMask, Sprite, SpriteSet, Texture, TextureId};
    use asteroids::platform::{HeadlessPresenter, InputSnapshot};
    use asteroids::sim::IntRect;
    use asteroids::{AssetError, GameLoop, Settings};

    const DEFAULT_SETTINGS_PATH: &str = "asteroids.json";
    const DEFAULT_DEMO_SECS: u64 = 10;
    const DEMO_FRAME_PACING: Duration = Duration::from_micros(8_333);

    const ROCK: [&str; 8] = [
        "..####..",
        ".######.",
        "########",
        "#######.",
        "########",
        "########",
        ".######.",
        "..###...",
    ];

    const SHIP: [&str; 10] = [
        "...#...",
        "...#...",
        "..###..",
        "..###..",
        ".#####.",
        ".#####.",
        "#######",
        "##.#.##",
        ".......",
        ".......",
    ];

    const SHIP_BURNER: [&str; 10] = [
        "...#...",
        "...#...",
        "..###..",
        "..###..",
        ".#####.",
        ".#####.",
        "#######",
        "##.#.##",
        "..###..",
        "...#...",
    ];

    const SAUCER: [&str; 6] = [
        "....####....",
        "..########..",
        "############",
        "############",
        "..########..",
        "...#....#...",
    ];

    const MISSILE: [&str; 5] = ["##", "##", "##", "##", "##"];
    const LASER: [&str; 6] = ["#", "#", "#", "#", "#", "#"];

    fn mask_from_art(art: &[&str]) -> Result<AlphaMask, AssetError> {
        let width = art.first().map_or(0, |row| row.len()) as u32;
        AlphaMask::from_fn(width, art.len() as u32, |x, y| {
            let opaque = art
                .get(y as usize)
                .and_then(|row| row.as_bytes().get(x as usize))
                .is_some_and(|&c| c == b'#');
            if opaque { 255 } else { 0 }
        })
    }

    /// Build every sprite from the built-in pixel art
    ///
    /// The ship and its burner frame share one atlas texture.
    fn load_sprites() -> Result<SpriteSet, AssetError> {
        let rock = mask_from_art(&ROCK)?;
        let asteroid = |id, scale| -> Result<Sprite, AssetError> {
            Ok(Sprite::new(Texture::new(TextureId(id), rock.scaled(scale, scale)?)))
        };

        let idle = mask_from_art(&SHIP)?.scaled(3.0, 3.0)?;
        let burner = mask_from_art(&SHIP_BURNER)?.scaled(3.0, 3.0)?;
        let (frame_w, frame_h) = (idle.width(), idle.height());
        let atlas = AlphaMask::from_fn(frame_w * 2, frame_h, |x, y| {
            if x < frame_w {
                idle.alpha_at(x as i32, y as i32)
            } else {
                burner.alpha_at((x - frame_w) as i32, y as i32)
            }
        })?;
        let atlas = Texture::new(TextureId(4), atlas);
        let frame = |index: i32| IntRect::new(index * frame_w as i32, 0, frame_w as i32, frame_h as i32);

        Ok(SpriteSet {
            asteroids: [asteroid(1, 2.5)?, asteroid(2, 5.0)?, asteroid(3, 10.0)?],
            ship: Sprite::with_sub_rect(atlas.clone(), frame(0))?,
            ship_burner: Sprite::with_sub_rect(atlas, frame(1))?,
            missile: Sprite::new(Texture::new(TextureId(6), mask_from_art(&MISSILE)?.scaled(2.0, 2.0)?)),
            enemy_ship: Sprite::new(Texture::new(TextureId(5), mask_from_art(&SAUCER)?.scaled(2.5, 2.5)?)),
            laser: Sprite::new(Texture::new(TextureId(7), mask_from_art(&LASER)?.scaled(2.0, 2.0)?)),
        })
    }

    /// Scripted pilot: sweeps around while thrusting in bursts and firing
    fn demo_input(frame: u64) -> InputSnapshot {
        InputSnapshot {
            move_forward: frame % 240 < 90,
            turn_left: frame % 600 < 200,
            turn_right: (300..360).contains(&(frame % 600)),
            fire: true,
            ..Default::default()
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings_path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
        let demo_secs = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEMO_SECS);

        let settings = match Settings::load(&settings_path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        };

        let sprites = match load_sprites() {
            Ok(sprites) => sprites,
            Err(e) => {
                log::error!("Failed to build sprites: {}", e);
                std::process::exit(1);
            }
        };

        let mut game = GameLoop::new(&settings, sprites);
        let frames = demo_secs * 1_000_000 / DEMO_FRAME_PACING.as_micros() as u64;
        let mut presenter = HeadlessPresenter::new(frames, demo_input).with_frame_pacing(DEMO_FRAME_PACING);

        game.run(&mut presenter);

        if let Some(hud) = presenter.last_hud() {
            log::info!(
                "Demo finished: score {}, lives {}, game over {}",
                hud.score,
                hud.lives,
                hud.game_over
            );
        }
        log::info!(
            "Presented {} frames ({} sprites, {} wrap ghosts)",
            presenter.frames(),
            presenter.commands_presented(),
            presenter.ghosts_presented()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Asteroids (native) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // A web presentation layer drives `GameLoop::frame` directly
}
