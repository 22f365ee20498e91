use crate::image_type::ImageType;
use crate::lifecycle::{validate_transition, ManifestPhase};
use crate::CoreError;
use ascode_runtime::{RuntimeError, ScratchDir, ToolInvocation};
use ascode_schema::{
    Blueprint, ContainerSourceSpec, ContainerSpec, CustomizationOverlay, OstreeCommitSpec,
    OstreeSourceSpec, PackageSet, PackageSpec, PipelineMap, OVERLAY_FILE_NAME,
};
use tracing::{debug, info, warn};

/// Output of a successful [`ManifestSynthesizer::serialize`].
#[derive(Debug)]
pub struct ManifestResult {
    /// Manifest bytes exactly as the tool wrote them to standard output.
    pub bytes: Vec<u8>,
    pub exports: Vec<String>,
    /// Set when the manifest was produced but the scratch directory could
    /// not be removed afterwards.
    pub cleanup_error: Option<RuntimeError>,
}

/// A blueprint bound to an image type, turned into a manifest exactly once.
#[derive(Debug)]
pub struct ManifestSynthesizer {
    blueprint: Blueprint,
    image_type: ImageType,
    phase: ManifestPhase,
}

impl ManifestSynthesizer {
    pub(crate) fn bind(blueprint: Blueprint, image_type: ImageType) -> Self {
        Self {
            blueprint,
            image_type,
            phase: ManifestPhase::Bound,
        }
    }

    pub fn phase(&self) -> ManifestPhase {
        self.phase
    }

    pub fn blueprint(&self) -> &Blueprint {
        &self.blueprint
    }

    pub fn image_type(&self) -> &ImageType {
        &self.image_type
    }

    pub fn overlay(&self) -> CustomizationOverlay {
        CustomizationOverlay::from_blueprint(&self.blueprint)
    }

    /// The tool arguments this synthesizer will use, given a scratch
    /// directory. The distribution directory is added as a second include
    /// path only when the image type belongs to a distribution.
    pub fn invocation(&self, scratch: &std::path::Path) -> ToolInvocation {
        let mut include_dirs = vec![scratch.to_path_buf()];
        if let Some(location) = self.image_type.distro() {
            include_dirs.push(location.dir());
        }
        ToolInvocation {
            include_dirs,
            template: self.image_type.template_path(),
        }
    }

    /// Produce the final manifest.
    ///
    /// The resolved package, container and ostree inputs are accepted for
    /// interface compatibility and are not consumed. Only valid from the
    /// `Bound` phase; the synthesizer ends in `Complete` or `Failed`.
    pub fn serialize(
        &mut self,
        _packages: &PipelineMap<PackageSpec>,
        _containers: &PipelineMap<ContainerSpec>,
        _ostree_commits: &PipelineMap<OstreeCommitSpec>,
    ) -> Result<ManifestResult, CoreError> {
        self.advance(ManifestPhase::Serializing)?;
        info!(
            "synthesizing manifest for {}/{}",
            self.image_type.arch_name(),
            self.image_type.name()
        );

        match self.run_tool() {
            Ok((bytes, cleanup_error)) => {
                self.advance(ManifestPhase::Complete)?;
                Ok(ManifestResult {
                    bytes,
                    exports: self.get_exports(),
                    cleanup_error,
                })
            }
            Err(e) => {
                self.advance(ManifestPhase::Failed)?;
                Err(e)
            }
        }
    }

    fn advance(&mut self, to: ManifestPhase) -> Result<(), CoreError> {
        validate_transition(self.phase, to)?;
        self.phase = to;
        Ok(())
    }

    fn run_tool(&self) -> Result<(Vec<u8>, Option<RuntimeError>), CoreError> {
        let scratch = ScratchDir::create()?;
        let outcome = self.run_in(&scratch);

        match (outcome, scratch.close()) {
            (Ok(bytes), Ok(())) => Ok((bytes, None)),
            (Ok(bytes), Err(cleanup)) => {
                warn!("manifest produced but scratch cleanup failed: {cleanup}");
                Ok((bytes, Some(cleanup)))
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(cleanup)) => Err(CoreError::CleanupAfterFailure {
                source: Box::new(e),
                cleanup,
            }),
        }
    }

    fn run_in(&self, scratch: &ScratchDir) -> Result<Vec<u8>, CoreError> {
        let overlay = self.overlay().to_yaml()?;
        let overlay_path = scratch.write_file(OVERLAY_FILE_NAME, overlay.as_bytes())?;
        debug!("wrote customization overlay to {}", overlay_path.display());

        let invocation = self.invocation(scratch.path());
        Ok(self.image_type.tool().run(&invocation)?)
    }

    pub fn get_exports(&self) -> Vec<String> {
        self.image_type.exports().to_vec()
    }

    pub fn get_checkpoints(&self) -> Vec<String> {
        Vec::new()
    }

    pub fn get_package_set_chains(&self) -> PipelineMap<PackageSet> {
        PipelineMap::new()
    }

    pub fn get_container_source_specs(&self) -> PipelineMap<ContainerSourceSpec> {
        PipelineMap::new()
    }

    pub fn get_ostree_source_specs(&self) -> PipelineMap<OstreeSourceSpec> {
        PipelineMap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distro::DistroLocation;
    use ascode_runtime::{ManifestTool, MockTool, ToolFailure};
    use ascode_schema::{parse_definition_str, Customizations, ImageOptions, Package};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    fn smurf_blueprint() -> Blueprint {
        Blueprint {
            packages: vec![Package::new("0ad")],
            customizations: Some(Customizations {
                hostname: Some("smurf.machine".to_owned()),
            }),
            ..Blueprint::default()
        }
    }

    fn standalone(tool: Arc<MockTool>) -> ImageType {
        let def =
            parse_definition_str("name: disk\nexports: [qcow2]\nmanifest: /defs/disk.mpp.yaml\n")
                .unwrap();
        ImageType::standalone(def).with_tool(tool)
    }

    fn serialize(m: &mut ManifestSynthesizer) -> Result<ManifestResult, CoreError> {
        m.serialize(&PipelineMap::new(), &PipelineMap::new(), &PipelineMap::new())
    }

    #[test]
    fn serialize_returns_tool_output_and_exports() {
        let tool = Arc::new(MockTool::new());
        let (mut m, _) = standalone(tool.clone()).manifest(
            &smurf_blueprint(),
            &ImageOptions::default(),
            &[],
            0,
        );
        assert_eq!(m.phase(), ManifestPhase::Bound);

        let result = serialize(&mut m).unwrap();
        assert!(!result.bytes.is_empty());
        assert_eq!(result.exports, vec!["qcow2"]);
        assert!(result.cleanup_error.is_none());
        assert_eq!(m.phase(), ManifestPhase::Complete);
    }

    #[test]
    fn overlay_is_written_before_tool_runs() {
        let tool = Arc::new(MockTool::new());
        let (mut m, _) =
            standalone(tool.clone()).manifest(&smurf_blueprint(), &ImageOptions::default(), &[], 0);
        serialize(&mut m).unwrap();

        let calls = tool.calls();
        assert_eq!(calls.len(), 1);
        let overlay = CustomizationOverlay::from_yaml(calls[0].overlay.as_deref().unwrap()).unwrap();
        assert_eq!(overlay.vars.extra_packages, vec!["0ad"]);
        assert_eq!(overlay.vars.hostname.as_deref(), Some("smurf.machine"));
    }

    #[test]
    fn standalone_passes_template_as_declared_with_one_include() {
        let tool = Arc::new(MockTool::new());
        let (mut m, _) =
            standalone(tool.clone()).manifest(&Blueprint::default(), &ImageOptions::default(), &[], 0);
        serialize(&mut m).unwrap();

        let calls = tool.calls();
        let call = &calls[0];
        assert_eq!(call.include_dirs.len(), 1);
        assert_eq!(call.template, PathBuf::from("/defs/disk.mpp.yaml"));
    }

    #[test]
    fn distro_bound_adds_distro_include() {
        let def = parse_definition_str("name: disk\nmanifest: disk.mpp.yaml\n").unwrap();
        let it = ImageType::new(
            def,
            Some(Arc::new(DistroLocation::new("/defs", "fedorang-39"))),
            Arc::new(MockTool::new()),
        );
        let (m, _) = it.manifest(&Blueprint::default(), &ImageOptions::default(), &[], 0);
        let inv = m.invocation(Path::new("/tmp/scratch"));
        assert_eq!(
            inv.include_dirs,
            vec![PathBuf::from("/tmp/scratch"), PathBuf::from("/defs/fedorang-39")]
        );
        assert_eq!(inv.template, PathBuf::from("/defs/fedorang-39/disk.mpp.yaml"));
    }

    #[test]
    fn tool_failure_removes_scratch_and_keeps_stdout() {
        let tool = Arc::new(MockTool::failing(2, "{\"version\":"));
        let (mut m, _) =
            standalone(tool.clone()).manifest(&smurf_blueprint(), &ImageOptions::default(), &[], 0);

        let err = serialize(&mut m).unwrap_err();
        match &err {
            CoreError::Runtime(RuntimeError::ExternalTool {
                failure: ToolFailure::Exit(_),
                stdout,
                ..
            }) => assert_eq!(stdout, "{\"version\":"),
            other => panic!("expected external tool error, got {other:?}"),
        }
        assert_eq!(m.phase(), ManifestPhase::Failed);

        let calls = tool.calls();
        let scratch = &calls[0].include_dirs[0];
        assert!(!scratch.exists(), "scratch dir must be removed on failure");
    }

    #[test]
    fn scratch_removed_after_success() {
        let tool = Arc::new(MockTool::new());
        let (mut m, _) =
            standalone(tool.clone()).manifest(&Blueprint::default(), &ImageOptions::default(), &[], 0);
        serialize(&mut m).unwrap();
        assert!(!tool.calls()[0].include_dirs[0].exists());
    }

    /// Removes the scratch directory out from under the synthesizer so the
    /// final cleanup fails.
    struct ScratchRemovingTool {
        fail: bool,
    }

    impl ManifestTool for ScratchRemovingTool {
        fn name(&self) -> &str {
            "scratch-removing"
        }

        fn available(&self) -> bool {
            true
        }

        fn run(&self, invocation: &ToolInvocation) -> Result<Vec<u8>, RuntimeError> {
            std::fs::remove_dir_all(&invocation.include_dirs[0]).unwrap();
            if self.fail {
                Err(RuntimeError::ExternalTool {
                    tool: self.name().to_owned(),
                    failure: ToolFailure::Exit("exit status: 1".to_owned()),
                    stdout: "partial".to_owned(),
                })
            } else {
                Ok(b"{\"version\":\"2\"}".to_vec())
            }
        }
    }

    fn removing(fail: bool) -> ManifestSynthesizer {
        let def = parse_definition_str("name: disk\nexports: [qcow2]\n").unwrap();
        let it = ImageType::standalone(def).with_tool(Arc::new(ScratchRemovingTool { fail }));
        it.manifest(&smurf_blueprint(), &ImageOptions::default(), &[], 0).0
    }

    #[test]
    fn cleanup_failure_after_success_is_attached_to_result() {
        let mut m = removing(false);
        let result = serialize(&mut m).unwrap();
        assert_eq!(result.bytes, b"{\"version\":\"2\"}");
        assert!(matches!(
            result.cleanup_error,
            Some(RuntimeError::TempResource { .. })
        ));
        assert_eq!(m.phase(), ManifestPhase::Complete);
    }

    #[test]
    fn cleanup_failure_after_tool_failure_keeps_both_errors() {
        let mut m = removing(true);
        let err = serialize(&mut m).unwrap_err();
        match &err {
            CoreError::CleanupAfterFailure { source, cleanup } => {
                assert!(matches!(
                    source.as_ref(),
                    CoreError::Runtime(RuntimeError::ExternalTool { stdout, .. }) if stdout == "partial"
                ));
                assert!(matches!(cleanup, RuntimeError::TempResource { .. }));
            }
            other => panic!("expected cleanup-after-failure, got {other:?}"),
        }
        assert!(err.to_string().contains("scratch cleanup also failed"));
        assert_eq!(m.phase(), ManifestPhase::Failed);
    }

    #[test]
    fn serialize_twice_is_rejected() {
        let tool = Arc::new(MockTool::new());
        let (mut m, _) =
            standalone(tool.clone()).manifest(&Blueprint::default(), &ImageOptions::default(), &[], 0);
        serialize(&mut m).unwrap();
        let err = serialize(&mut m).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(tool.calls().len(), 1);
    }

    #[test]
    fn contract_accessors_are_empty() {
        let (m, _) = standalone(Arc::new(MockTool::new())).manifest(
            &Blueprint::default(),
            &ImageOptions::default(),
            &[],
            0,
        );
        assert!(m.get_checkpoints().is_empty());
        assert!(m.get_package_set_chains().is_empty());
        assert!(m.get_container_source_specs().is_empty());
        assert!(m.get_ostree_source_specs().is_empty());
    }
}
