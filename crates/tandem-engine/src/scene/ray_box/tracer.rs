use crate::sim::{BlockSize, ComputeEncoder, Domain, ResourceId, SimError, Workgroups};

/// A bind group built against one output image.
///
/// The image is replaced on every resize; using the group afterwards is an
/// error until it is rebuilt against the new image.
#[derive(Debug)]
pub struct TargetBinding<B> {
    label: String,
    target: ResourceId,
    group: B,
}

impl<B> TargetBinding<B> {
    pub fn new(label: &str, target: ResourceId, group: B) -> Self {
        Self { label: label.to_string(), target, group }
    }

    #[inline]
    pub fn target(&self) -> ResourceId {
        self.target
    }

    pub fn select(&self, target: ResourceId) -> Result<&B, SimError> {
        if target != self.target {
            return Err(SimError::StaleBinding { label: self.label.clone() });
        }
        Ok(&self.group)
    }
}

/// The output image the tracer writes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TargetInfo {
    pub id: ResourceId,
    pub width: u32,
    pub height: u32,
}

/// Ray-casting stage: one invocation per output pixel.
#[derive(Debug)]
pub struct RayTracer<P, B> {
    orthographic: P,
    projective: P,
    binding: TargetBinding<B>,
}

impl<P, B> RayTracer<P, B> {
    pub const BLOCK: BlockSize = BlockSize::TILE_16X16;

    pub fn new(orthographic: P, projective: P, binding: TargetBinding<B>) -> Self {
        Self { orthographic, projective, binding }
    }

    pub fn rebind(&mut self, binding: TargetBinding<B>) {
        self.binding = binding;
    }

    #[inline]
    pub fn binding(&self) -> &TargetBinding<B> {
        &self.binding
    }

    pub fn dispatch<E>(&self, encoder: &mut E, target: TargetInfo, projective: bool) -> Result<Workgroups, SimError>
    where
        E: ComputeEncoder<Pipeline = P, BindGroup = B>,
    {
        let group = self.binding.select(target.id)?;
        let pipeline = if projective { &self.projective } else { &self.orthographic };
        let groups = Domain::Grid { width: target.width, height: target.height }.workgroups(Self::BLOCK);

        encoder.set_pipeline(pipeline);
        encoder.set_bind_group(0, group);
        encoder.dispatch(groups);
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CommandLog, Recorded};

    fn tracer(target: ResourceId) -> RayTracer<String, &'static str> {
        RayTracer::new(
            "ortho".to_string(),
            "proj".to_string(),
            TargetBinding::new("trace", target, "group@1"),
        )
    }

    #[test]
    fn covers_image_in_16px_tiles() {
        let id = ResourceId::fresh();
        let t = tracer(id);
        let mut log = CommandLog::new();

        let groups = t
            .dispatch(&mut log, TargetInfo { id, width: 1280, height: 721 }, false)
            .unwrap();
        assert_eq!((groups.x, groups.y, groups.z), (80, 46, 1));
        assert_eq!(log.commands[0], Recorded::Pipeline("ortho".into()));
    }

    #[test]
    fn projection_selects_pipeline() {
        let id = ResourceId::fresh();
        let t = tracer(id);
        let mut log = CommandLog::new();
        t.dispatch(&mut log, TargetInfo { id, width: 16, height: 16 }, true).unwrap();
        assert_eq!(log.commands[0], Recorded::Pipeline("proj".into()));
        assert_eq!(log.bind_groups().copied().collect::<Vec<_>>(), vec!["group@1"]);
    }

    #[test]
    fn replaced_image_needs_rebind() {
        let old = ResourceId::fresh();
        let mut t = tracer(old);
        let new = TargetInfo { id: ResourceId::fresh(), width: 32, height: 32 };
        let mut log = CommandLog::new();

        let err = t.dispatch(&mut log, new, false).unwrap_err();
        assert!(matches!(err, SimError::StaleBinding { .. }));
        assert!(log.commands.is_empty());

        t.rebind(TargetBinding::new("trace", new.id, "group@2"));
        t.dispatch(&mut log, new, false).unwrap();
        assert_eq!(log.dispatch_count(), 1);
    }
}
