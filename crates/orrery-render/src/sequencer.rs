//! Fixed per-frame pass ordering.
//!
//! The frame is a strict sequence: clear, ambient base, procedural base,
//! the bloom-or-ambient branch for the bloom bucket, then for every active
//! light its shadow maps (plain casters, then procedural casters) followed
//! immediately by its two additive contribution passes. A light's shadow map
//! is therefore always complete before anything samples it.

use orrery_lighting::LightRig;
use orrery_scene::{ActorRegistry, FrameContext, FrameToggles};

use crate::passes::ScenePasses;

/// Drives [`ScenePasses`] through one frame in the fixed order.
#[derive(Debug, Default)]
pub struct FrameSequencer;

impl FrameSequencer {
    pub fn new() -> Self {
        Self
    }

    /// Render one frame.
    ///
    /// Lights are visited in the rig's role order, so identical inputs
    /// produce an identical pass sequence.
    pub fn render_frame<P: ScenePasses>(
        &self,
        passes: &mut P,
        ctx: &FrameContext,
        toggles: FrameToggles,
        registry: &ActorRegistry,
        rig: &LightRig,
    ) {
        let plain = registry.plain_with_vehicle();
        let procedural = &registry.procedural;
        let bloom = &registry.bloom;

        passes.clear(ctx);
        passes.render_ambient(ctx, &plain);
        passes.render_perlin(ctx, procedural);
        if toggles.bloom {
            passes.render_bloom(ctx, bloom);
        } else {
            passes.render_ambient(ctx, bloom);
        }

        for (role, light) in rig.iter() {
            passes.render_shadowmap(role, light, ctx, &plain);
            passes.render_shadowmap(role, light, ctx, procedural);
            passes.draw_phong_contribution(role, light, ctx, &plain);
            passes.draw_perlin_phong_contribution(role, light, ctx, procedural);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use orrery_lighting::{Light, LightRole, sun_light};
    use orrery_scene::{Actor, MeshHandle};

    /// Pass log entry recorded by the test backend.
    #[derive(Debug, Clone, PartialEq)]
    enum PassEvent {
        Clear,
        Ambient(usize),
        Perlin(usize),
        Bloom(usize),
        ShadowMap(LightRole, usize),
        Phong(LightRole, usize),
        PerlinPhong(LightRole, usize),
    }

    #[derive(Default)]
    struct RecordingPasses {
        events: Vec<PassEvent>,
    }

    impl ScenePasses for RecordingPasses {
        fn clear(&mut self, _ctx: &FrameContext) {
            self.events.push(PassEvent::Clear);
        }

        fn render_ambient(&mut self, _ctx: &FrameContext, actors: &[Actor]) {
            self.events.push(PassEvent::Ambient(actors.len()));
        }

        fn render_perlin(&mut self, _ctx: &FrameContext, actors: &[Actor]) {
            self.events.push(PassEvent::Perlin(actors.len()));
        }

        fn render_bloom(&mut self, _ctx: &FrameContext, actors: &[Actor]) {
            self.events.push(PassEvent::Bloom(actors.len()));
        }

        fn render_shadowmap(
            &mut self,
            role: LightRole,
            _light: &Light,
            _ctx: &FrameContext,
            actors: &[Actor],
        ) {
            self.events.push(PassEvent::ShadowMap(role, actors.len()));
        }

        fn draw_phong_contribution(
            &mut self,
            role: LightRole,
            _light: &Light,
            _ctx: &FrameContext,
            actors: &[Actor],
        ) {
            self.events.push(PassEvent::Phong(role, actors.len()));
        }

        fn draw_perlin_phong_contribution(
            &mut self,
            role: LightRole,
            _light: &Light,
            _ctx: &FrameContext,
            actors: &[Actor],
        ) {
            self.events.push(PassEvent::PerlinPhong(role, actors.len()));
        }
    }

    fn ctx() -> FrameContext {
        FrameContext {
            sim_time: 0.0,
            view: Mat4::IDENTITY,
            scene_view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            ambient_light_color: FrameContext::AMBIENT,
            flat_shading: false,
            car_speed: 0.0,
            vehicle_heading: 0.0,
        }
    }

    fn registry() -> ActorRegistry {
        let mut registry = ActorRegistry::new();
        registry
            .plain
            .push(Actor::static_prop(MeshHandle(0), Mat4::IDENTITY));
        registry
            .plain
            .push(Actor::static_prop(MeshHandle(1), Mat4::IDENTITY));
        registry
            .procedural
            .push(Actor::static_prop(MeshHandle(2), Mat4::IDENTITY));
        registry
            .bloom
            .push(Actor::static_prop(MeshHandle(3), Mat4::IDENTITY));
        registry
    }

    fn sun_rig() -> LightRig {
        let mut rig = LightRig::new();
        rig.insert(LightRole::Sun, sun_light());
        rig
    }

    fn render(toggles: FrameToggles, rig: &LightRig) -> Vec<PassEvent> {
        let mut passes = RecordingPasses::default();
        FrameSequencer::new().render_frame(&mut passes, &ctx(), toggles, &registry(), rig);
        passes.events
    }

    #[test]
    fn test_frame_order_with_bloom_enabled() {
        let toggles = FrameToggles {
            bloom: true,
            ..FrameToggles::default()
        };
        let events = render(toggles, &sun_rig());
        assert_eq!(
            events,
            vec![
                PassEvent::Clear,
                PassEvent::Ambient(2),
                PassEvent::Perlin(1),
                PassEvent::Bloom(1),
                PassEvent::ShadowMap(LightRole::Sun, 2),
                PassEvent::ShadowMap(LightRole::Sun, 1),
                PassEvent::Phong(LightRole::Sun, 2),
                PassEvent::PerlinPhong(LightRole::Sun, 1),
            ]
        );
    }

    #[test]
    fn test_bloom_off_falls_back_to_ambient() {
        let events = render(FrameToggles::default(), &sun_rig());
        assert!(!events.iter().any(|e| matches!(e, PassEvent::Bloom(_))));
        // The bloom bucket still gets drawn, through the ambient pass.
        assert_eq!(events[3], PassEvent::Ambient(1));
    }

    #[test]
    fn test_shadowmaps_precede_contributions_per_light() {
        let mut rig = sun_rig();
        rig.toggle_headlights(true);
        let events = render(FrameToggles::default(), &rig);

        for (role, _) in rig.iter() {
            let first_shadow = events
                .iter()
                .position(|e| matches!(e, PassEvent::ShadowMap(r, _) if *r == role))
                .unwrap();
            let first_contribution = events
                .iter()
                .position(|e| matches!(e, PassEvent::Phong(r, _) if *r == role))
                .unwrap();
            assert!(first_shadow < first_contribution, "role {role:?}");
        }
    }

    #[test]
    fn test_lights_visit_in_role_order() {
        let mut rig = LightRig::new();
        rig.toggle_headlights(true);
        rig.insert(LightRole::Sun, sun_light());
        let events = render(FrameToggles::default(), &rig);

        let phong_roles: Vec<LightRole> = events
            .iter()
            .filter_map(|e| match e {
                PassEvent::Phong(role, _) => Some(*role),
                _ => None,
            })
            .collect();
        assert_eq!(
            phong_roles,
            vec![
                LightRole::Sun,
                LightRole::HeadlightLeft,
                LightRole::HeadlightRight
            ]
        );
    }

    #[test]
    fn test_empty_rig_still_renders_base_passes() {
        let events = render(FrameToggles::default(), &LightRig::new());
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], PassEvent::Clear);
    }

    #[test]
    fn test_identical_input_gives_identical_sequence() {
        let rig = sun_rig();
        let a = render(FrameToggles::default(), &rig);
        let b = render(FrameToggles::default(), &rig);
        assert_eq!(a, b);
    }
}
