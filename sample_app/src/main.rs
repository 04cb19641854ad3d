//! Render Queue Demo
//!
//! Runs a fixed number of frames against the headless device:
//! - A field of opaque rocks and a few blended glass panes under a parent node
//! - A HUD element in the GUI bucket
//! - Ships and bullets drawn through the sprite batch every frame
//!
//! Pass a `.toml` or `.ron` engine config as the first argument to override
//! the defaults. Per-frame statistics are logged at `info`.

use rc_engine::foundation::logging;
use rc_engine::prelude::*;
use rc_engine::scene::Aabb;
use std::f32::consts::PI;

// Frame loop settings
const FRAME_COUNT: usize = 8;
const SCREEN_WIDTH: f32 = 1280.0;
const SCREEN_HEIGHT: f32 = 720.0;

// Scene contents
const ROCK_COUNT: usize = 12;
const GLASS_COUNT: usize = 3;
const SHIP_COUNT: usize = 5;

/// Errors that end the demo
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] rc_engine::config::ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Scene error: {0}")]
    Scene(#[from] rc_engine::scene::SceneError),
}

struct RenderQueueDemo {
    scene: SceneManager,
    renderer: BatchRenderer,
    device: HeadlessDevice,
    sprites: SpriteBatch,
    camera: Camera,
    ship_texture: Texture,
    bullet_texture: Texture,
    order: RenderOrder,
}

impl RenderQueueDemo {
    fn new(config: &EngineConfig) -> Result<Self, DemoError> {
        let mut scene = SceneManager::with_config(config);
        Self::populate(scene.graph_mut())?;

        let mut camera = Camera::perspective(Vec3::new(0.0, 5.0, 30.0), 60.0, SCREEN_WIDTH / SCREEN_HEIGHT, 0.1, 200.0);
        camera.set_target(Vec3::zeros());

        let mut device = HeadlessDevice::new();
        let ship_texture = Texture::new(TextureId(1), "ship", TextureDesc::texture_2d(PixelFormat::Rgba8UnormSrgb, 64, 64).with_mip_levels(7));
        let bullet_texture = Texture::new(TextureId(2), "bullet", TextureDesc::texture_2d(PixelFormat::Rgba8UnormSrgb, 8, 8));

        for texture in [&ship_texture, &bullet_texture] {
            let view = rc_engine::render::device::create_texture_srv(
                &mut device,
                texture,
                MipRange::full(texture.desc.mip_levels),
                SliceRange::single(),
            )?;
            log::info!("Created view {:?} for texture '{}'", view, texture.name);
        }

        Ok(Self {
            scene,
            renderer: BatchRenderer::new(),
            device,
            sprites: SpriteBatch::new(
                Material::new("SpriteEffect", ResourceHandle(900)).with_alpha_mode(AlphaMode::Blend),
                &config.sprite_batch,
            ),
            camera,
            ship_texture,
            bullet_texture,
            order: config.scene.default_render_order,
        })
    }

    fn populate(graph: &mut SceneGraph) -> Result<(), DemoError> {
        let root = graph.root();
        let field = graph.create_child_node(root, "AsteroidField")?;
        graph.set_local_transform(field, Transform::from_position(Vec3::new(0.0, 0.0, -10.0)))?;

        // Placeholder buffers; the headless device only checks that they are bound
        let geometry = RenderOperation::indexed(
            rc_engine::render::BufferHandle(u32::MAX - 1),
            rc_engine::render::BufferHandle(u32::MAX),
            32,
            36,
        );
        let bounds = Aabb::from_center_extents(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

        for i in 0..ROCK_COUNT {
            let angle = i as f32 / ROCK_COUNT as f32 * 2.0 * PI;
            let node = graph.create_child_node(field, format!("Rock{i}"))?;
            graph.set_local_transform(node, Transform::from_position(Vec3::new(angle.cos() * 15.0, 0.0, angle.sin() * 15.0)))?;

            // Two rock materials so the sort has something to group
            let material = Material::new(format!("Rock{}", i % 2), ResourceHandle(100 + (i % 2) as u64));
            graph.spawn_object(node, SceneObject::mesh(format!("Rock{i}"), MeshEntity::new(material, geometry.clone()).with_bounds(bounds)))?;
        }

        for i in 0..GLASS_COUNT {
            let node = graph.create_child_node(field, format!("Glass{i}"))?;
            graph.set_local_transform(node, Transform::from_position(Vec3::new(i as f32 * 4.0 - 4.0, 2.0, 5.0)))?;
            let material = Material::new("Glass", ResourceHandle(200)).with_alpha_mode(AlphaMode::Blend);
            graph.spawn_object(node, SceneObject::mesh(format!("Glass{i}"), MeshEntity::new(material, geometry.clone()).with_bounds(bounds)))?;
        }

        graph.spawn_object(root, SceneObject::gui("Hud", GuiElement::new(Material::new("Hud", ResourceHandle(300)), geometry)))?;
        Ok(())
    }

    fn draw_sprites(&mut self, frame: usize) -> Result<(), DemoError> {
        let graph = self.scene.graph_mut();
        self.sprites.begin(graph)?;

        for ship in 0..SHIP_COUNT {
            let rotation = (frame * 10 + ship * 72) as f32 * PI / 180.0;
            let position = Vec2::new(100.0 + ship as f32 * 200.0, SCREEN_HEIGHT - 100.0);
            self.sprites.draw_scaled_uniform(
                graph,
                &self.ship_texture,
                position,
                None,
                Color::WHITE,
                rotation,
                Vec2::new(0.5, 0.5),
                1.5,
                0.5,
            )?;
        }

        // Bullets only on even frames, so their bucket is hidden on odd ones
        if frame % 2 == 0 {
            for bullet in 0..frame + 1 {
                let dest = IntRect::new(200 + bullet as i32 * 40, 300, 8, 8);
                self.sprites.draw(graph, &self.bullet_texture, dest, Color::rgb(1.0, 0.8, 0.2))?;
            }
        }

        // Faded out completely; never reaches the buffers
        self.sprites.draw_at(graph, &self.ship_texture, Vec2::new(10.0, 10.0), None, Color::TRANSPARENT)?;

        self.sprites.end(graph, &mut self.device)?;
        Ok(())
    }

    fn run(mut self) -> Result<(), DemoError> {
        for frame in 0..FRAME_COUNT {
            self.draw_sprites(frame)?;

            self.device.clear_draws();
            let traversal = self.scene.update_render_queue(&self.camera, self.order);
            let stats = self.scene.submit(&mut self.renderer, &mut self.device);

            log::info!(
                "Frame {}: {} queued ({} culled), {} drawn, {} failed, {} state changes, buckets {:?}, {} us",
                frame,
                traversal.queued,
                traversal.culled,
                stats.submitted,
                stats.failed,
                stats.state_changes,
                stats.per_bucket,
                stats.total_time_us()
            );

            // Orbit the camera around the field
            let angle = (frame + 1) as f32 * 0.2;
            self.camera.set_position(Vec3::new(angle.sin() * 30.0, 5.0, angle.cos() * 30.0));
        }

        log::info!(
            "Done: {} buffers created, {} draws in the last frame",
            self.device.buffer_count(),
            self.device.draws().len()
        );
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    logging::init_with_level(config.log_level_filter()?);

    log::info!("=== Render Queue Demo ===");
    log::info!("Render order: {:?}, frustum culling: {}", config.scene.default_render_order, config.scene.frustum_culling);

    let demo = RenderQueueDemo::new(&config)?;
    demo.run()?;
    Ok(())
}
