use crate::distro::Distribution;
use crate::image_type::ImageType;
use crate::CoreError;
use ascode_schema::{ArchName, ImageTypeName};

/// Read-only view of a distribution's image types for one architecture.
#[derive(Debug, Clone, Copy)]
pub struct ArchitectureView<'a> {
    name: &'a str,
    distro: &'a Distribution,
}

impl<'a> ArchitectureView<'a> {
    pub(crate) fn new(name: &'a str, distro: &'a Distribution) -> Self {
        Self { name, distro }
    }

    pub fn name(&self) -> ArchName {
        ArchName::new(self.name)
    }

    pub fn image_types(&self) -> impl Iterator<Item = &'a ImageType> + 'a {
        let arch = self.name;
        self.distro
            .image_types()
            .iter()
            .filter(move |it| it.arch_name() == arch)
    }

    /// Image type names in discovery order.
    pub fn list_image_types(&self) -> Vec<ImageTypeName> {
        self.image_types()
            .map(|it| ImageTypeName::new(it.name()))
            .collect()
    }

    pub fn get_image_type(&self, name: &str) -> Result<&'a ImageType, CoreError> {
        self.image_types()
            .find(|it| it.name() == name)
            .ok_or_else(|| CoreError::ImageTypeNotFound {
                arch: self.name.to_owned(),
                name: name.to_owned(),
            })
    }

    pub fn parent_distribution(&self) -> &'a Distribution {
        self.distro
    }
}
