//! Gun selection and gunpoint geometry
//!
//! Models are arenas of submodels linked to their parents by index. A
//! submodel whose parent is [`ROOT_SUBMODEL`] is the model root.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parent index marking the root of a submodel chain
pub const ROOT_SUBMODEL: u8 = 255;

/// Pick the next gun for a shot
///
/// Primary fire rotates through `0..guns`, reserving gun 0 for the
/// secondary weapon when one exists. Secondary fire always uses gun 0.
pub fn choose_gun(gun_index: &mut u8, guns: u8, has_secondary: bool, primary: bool) -> u8 {
    if !primary {
        return 0;
    }

    *gun_index = if guns > 0 {
        ((*gun_index as u16 + 1) % guns as u16) as u8
    } else {
        0
    };

    if has_secondary && *gun_index == 0 && guns > 1 {
        *gun_index = 1;
    }
    *gun_index
}

/// A jointed part of a model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Submodel {
    /// Joint offset relative to the parent
    pub offset: Vec3,
    /// Parent submodel index or [`ROOT_SUBMODEL`]
    pub parent: u8,
}

impl Submodel {
    pub fn root() -> Self {
        Self {
            offset: Vec3::ZERO,
            parent: ROOT_SUBMODEL,
        }
    }

    pub fn child_of(parent: u8, offset: Vec3) -> Self {
        Self { offset, parent }
    }
}

/// Muzzle location attached to a submodel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gunpoint {
    pub submodel: u8,
    /// Position relative to the submodel joint
    pub point: Vec3,
}

/// Submodels and gunpoints of an agent model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub submodels: Vec<Submodel>,
    #[serde(default)]
    pub gunpoints: Vec<Gunpoint>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a submodel; its index is its position in the arena
    pub fn with_submodel(mut self, submodel: Submodel) -> Self {
        self.submodels.push(submodel);
        self
    }

    pub fn with_gunpoint(mut self, submodel: u8, point: Vec3) -> Self {
        self.gunpoints.push(Gunpoint { submodel, point });
        self
    }

    /// Joint offset of a submodel in model space
    ///
    /// Sums the offsets along the parent chain up to (excluding) the root.
    /// Unknown indices yield zero. Malformed chains stop after visiting
    /// every submodel once.
    pub fn submodel_offset(&self, index: u8) -> Vec3 {
        let mut offset = Vec3::ZERO;
        let mut current = index as usize;

        for _ in 0..self.submodels.len() {
            let Some(submodel) = self.submodels.get(current) else {
                break;
            };
            if submodel.parent == ROOT_SUBMODEL {
                return offset;
            }
            offset += submodel.offset;
            current = submodel.parent as usize;
        }

        if self.submodels.get(index as usize).is_some() {
            log::warn!("Submodel {} has a broken parent chain", index);
        }
        offset
    }

    /// Muzzle offset of a gun in model space; unknown guns yield zero
    pub fn gunpoint_offset(&self, gun: u8) -> Vec3 {
        match self.gunpoints.get(gun as usize) {
            Some(gunpoint) => self.submodel_offset(gunpoint.submodel) + gunpoint.point,
            None => Vec3::ZERO,
        }
    }
}
