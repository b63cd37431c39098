use crate::render::RenderCtx;

use super::SimError;

/// Construction phase of a scene object.
///
/// Phases only move forward, one at a time; `Active` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord)]
pub enum Lifecycle {
    Uninitialized,
    GeometryReady,
    ShadersReady,
    PipelinesReady,
    Active,
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::GeometryReady => "geometry ready",
            Lifecycle::ShadersReady => "shaders ready",
            Lifecycle::PipelinesReady => "pipelines ready",
            Lifecycle::Active => "active",
        };
        f.write_str(s)
    }
}

/// Enforces the creation order of a scene object.
///
/// Compute and render pipelines may be created in either order; both must
/// exist before the object reaches `PipelinesReady`.
#[derive(Debug, Clone)]
pub struct LifecycleTracker {
    object: &'static str,
    phase: Lifecycle,
    compute_ready: bool,
    render_ready: bool,
}

impl LifecycleTracker {
    pub fn new(object: &'static str) -> Self {
        Self {
            object,
            phase: Lifecycle::Uninitialized,
            compute_ready: false,
            render_ready: false,
        }
    }

    #[inline]
    pub fn phase(&self) -> Lifecycle {
        self.phase
    }

    pub fn geometry_created(&mut self) -> Result<(), SimError> {
        self.transition(Lifecycle::Uninitialized, Lifecycle::GeometryReady)
    }

    pub fn shaders_created(&mut self) -> Result<(), SimError> {
        self.transition(Lifecycle::GeometryReady, Lifecycle::ShadersReady)
    }

    pub fn compute_pipeline_created(&mut self) -> Result<(), SimError> {
        self.ensure(Lifecycle::ShadersReady)?;
        self.compute_ready = true;
        self.promote_pipelines();
        Ok(())
    }

    pub fn render_pipeline_created(&mut self) -> Result<(), SimError> {
        self.ensure(Lifecycle::ShadersReady)?;
        self.render_ready = true;
        self.promote_pipelines();
        Ok(())
    }

    /// Gate for `update`/`compute`/`render`. Promotes `PipelinesReady` to
    /// `Active` on first use.
    pub fn require_pipelines(&mut self) -> Result<(), SimError> {
        match self.phase {
            Lifecycle::Active => Ok(()),
            Lifecycle::PipelinesReady => {
                self.phase = Lifecycle::Active;
                log::debug!("{}: {}", self.object, self.phase);
                Ok(())
            }
            actual => Err(self.precondition(Lifecycle::PipelinesReady, actual)),
        }
    }

    fn promote_pipelines(&mut self) {
        if self.compute_ready && self.render_ready {
            self.phase = Lifecycle::PipelinesReady;
            log::debug!("{}: {}", self.object, self.phase);
        }
    }

    /// Fails unless the object is exactly in `expected`.
    pub fn ensure(&self, expected: Lifecycle) -> Result<(), SimError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.missing(expected))
        }
    }

    /// Error for a step that needs `expected` in the current phase.
    pub fn missing(&self, expected: Lifecycle) -> SimError {
        self.precondition(expected, self.phase)
    }

    fn transition(&mut self, from: Lifecycle, to: Lifecycle) -> Result<(), SimError> {
        self.ensure(from)?;
        self.phase = to;
        log::debug!("{}: {}", self.object, self.phase);
        Ok(())
    }

    /// Error for a step that needs `expected` while the object is in `actual`.
    pub fn precondition(&self, expected: Lifecycle, actual: Lifecycle) -> SimError {
        SimError::Precondition {
            object: self.object.to_string(),
            expected,
            actual,
        }
    }
}

/// A GPU-simulated object that can be created, stepped and drawn.
///
/// Construction runs in four ordered steps (see [`initialize`]). Per frame the
/// runtime calls `update`, then `compute` inside a compute pass, then `render`
/// inside the render pass of the same command encoder.
pub trait SceneObject {
    fn name(&self) -> &'static str;

    fn lifecycle(&self) -> Lifecycle;

    /// Allocates buffers and uploads initial contents.
    fn create_geometry(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError>;

    /// Compiles shader modules.
    fn create_shaders(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError>;

    /// Creates the compute pipeline(s) and their bind sets.
    fn create_compute_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError>;

    /// Creates the render pipeline(s) and their bind sets.
    fn create_render_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError>;

    /// Drains input and writes per-frame uniforms. `dt` is in seconds.
    fn update(&mut self, ctx: &RenderCtx<'_>, dt: f32) -> Result<(), SimError>;

    fn compute(&mut self, pass: &mut wgpu::ComputePass<'_>) -> Result<(), SimError>;

    fn render(&mut self, pass: &mut wgpu::RenderPass<'_>) -> Result<(), SimError>;

    /// Called after the surface changed size.
    fn resize(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
        let _ = ctx;
        Ok(())
    }
}

/// Runs the four creation steps in order.
pub fn initialize<O: SceneObject + ?Sized>(obj: &mut O, ctx: &RenderCtx<'_>) -> Result<(), SimError> {
    obj.create_geometry(ctx)?;
    obj.create_shaders(ctx)?;
    obj.create_compute_pipeline(ctx)?;
    obj.create_render_pipeline(ctx)?;
    log::info!("{} initialized", obj.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> LifecycleTracker {
        let mut t = LifecycleTracker::new("demo-object");
        t.geometry_created().unwrap();
        t.shaders_created().unwrap();
        t
    }

    #[test]
    fn full_order_reaches_active() {
        let mut t = ready();
        t.render_pipeline_created().unwrap();
        assert_eq!(t.phase(), Lifecycle::ShadersReady);
        t.compute_pipeline_created().unwrap();
        assert_eq!(t.phase(), Lifecycle::PipelinesReady);

        t.require_pipelines().unwrap();
        assert_eq!(t.phase(), Lifecycle::Active);
        t.require_pipelines().unwrap();
        assert_eq!(t.phase(), Lifecycle::Active);
    }

    #[test]
    fn shaders_before_geometry_is_precondition() {
        let mut t = LifecycleTracker::new("demo-object");
        assert_eq!(
            t.shaders_created().unwrap_err(),
            SimError::Precondition {
                object: "demo-object".into(),
                expected: Lifecycle::GeometryReady,
                actual: Lifecycle::Uninitialized,
            }
        );
        assert_eq!(t.phase(), Lifecycle::Uninitialized);
    }

    #[test]
    fn pipelines_before_shaders_is_precondition() {
        let mut t = LifecycleTracker::new("demo-object");
        t.geometry_created().unwrap();
        assert!(matches!(
            t.compute_pipeline_created(),
            Err(SimError::Precondition { expected: Lifecycle::ShadersReady, .. })
        ));
    }

    #[test]
    fn compute_before_pipelines_is_precondition() {
        let mut t = ready();
        t.compute_pipeline_created().unwrap();
        assert!(matches!(
            t.require_pipelines(),
            Err(SimError::Precondition { actual: Lifecycle::ShadersReady, .. })
        ));
    }

    #[test]
    fn geometry_twice_is_rejected() {
        let mut t = LifecycleTracker::new("demo-object");
        t.geometry_created().unwrap();
        assert!(t.geometry_created().is_err());
    }
}
