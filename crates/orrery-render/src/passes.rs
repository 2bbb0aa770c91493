//! The render backend seam.
//!
//! [`ScenePasses`] is the set of pass operations the frame sequencer drives.
//! The wgpu renderer implements it for real frames; the sequencer tests
//! implement it with a recorder to pin down pass ordering without a GPU.

use orrery_lighting::{Light, LightRole};
use orrery_scene::{Actor, FrameContext};

/// One frame's worth of pass operations, in the order the sequencer calls
/// them.
pub trait ScenePasses {
    /// Start the frame: reset per-frame state and clear color and depth.
    fn clear(&mut self, ctx: &FrameContext);

    /// Draw a group with the plain ambient shader.
    fn render_ambient(&mut self, ctx: &FrameContext, actors: &[Actor]);

    /// Draw a group with the procedural (noise-textured) ambient shader.
    fn render_perlin(&mut self, ctx: &FrameContext, actors: &[Actor]);

    /// Draw a group with the self-lit bloom shader.
    fn render_bloom(&mut self, ctx: &FrameContext, actors: &[Actor]);

    /// Render a caster group into the light's shadow map.
    ///
    /// The first call for a role in a frame clears the map; later calls
    /// accumulate into it.
    fn render_shadowmap(
        &mut self,
        role: LightRole,
        light: &Light,
        ctx: &FrameContext,
        actors: &[Actor],
    );

    /// Additively draw one light's contribution for plain-shaded actors.
    fn draw_phong_contribution(
        &mut self,
        role: LightRole,
        light: &Light,
        ctx: &FrameContext,
        actors: &[Actor],
    );

    /// Additively draw one light's contribution for procedural actors.
    fn draw_perlin_phong_contribution(
        &mut self,
        role: LightRole,
        light: &Light,
        ctx: &FrameContext,
        actors: &[Actor],
    );
}
