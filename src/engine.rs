use crate::actor::{Actor, Motion};
use crate::caster::RayCaster;
use crate::config::Config;
use crate::input::InputState;
use crate::renderer::{FrameBuffer, pack_rgb};
use crate::texture::TextureSet;
use crate::world::WorldGrid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Quit,
}

/// Everything one session needs: the map, the player, the caster and the
/// frame it draws into. The frame loop drives it one tick at a time.
pub struct Engine {
    grid: WorldGrid,
    actor: Actor,
    motion: Motion,
    caster: RayCaster,
    frame: FrameBuffer,
    ceiling: u32,
    floor: u32,
    ticks: u64,
}

impl Engine {
    pub fn new(cfg: &Config, grid: WorldGrid, textures: TextureSet) -> Self {
        let actor = Actor::new(cfg.start.x, cfg.start.y, cfg.start.heading_degrees.to_radians());
        if grid.wall_at(actor.x, actor.y) {
            log::warn!(
                "start position ({}, {}) is inside a wall; movement will be blocked",
                actor.x,
                actor.y
            );
        }
        let caster = RayCaster::new(cfg, textures);
        let frame = FrameBuffer::new(caster.num_rays(), cfg.window_height as usize);
        let [cr, cg, cb] = cfg.colors.ceiling;
        let [fr, fg, fb] = cfg.colors.floor;

        let mut engine = Self {
            grid,
            actor,
            motion: Motion::from_config(cfg),
            caster,
            frame,
            ceiling: pack_rgb(cr, cg, cb),
            floor: pack_rgb(fr, fg, fb),
            ticks: 0,
        };
        // Have a sweep ready before the first tick
        engine.caster.cast_all(&engine.actor, &engine.grid);
        engine
    }

    /// Advances one fixed tick: move the actor, then re-cast every column.
    pub fn step(&mut self, input: &InputState) -> StepOutcome {
        if input.quit {
            return StepOutcome::Quit;
        }
        self.actor.update(input, &self.motion, &self.grid);
        self.caster.cast_all(&self.actor, &self.grid);
        self.ticks += 1;
        StepOutcome::Continue
    }

    pub fn render(&mut self) -> &FrameBuffer {
        self.frame.clear_split(self.ceiling, self.floor);
        self.caster.render(&mut self.frame);
        &self.frame
    }

    #[inline]
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    #[inline]
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    #[inline]
    pub fn caster(&self) -> &RayCaster {
        &self.caster
    }

    #[inline]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
