// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the Apache-style license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Class of device a tensor is tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Cpu,
    Cuda,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Cpu => write!(f, "cpu"),
            DeviceType::Cuda => write!(f, "cuda"),
        }
    }
}

/// Device placement of a tensor.
///
/// Storage always lives in host memory; the device only decides which kernel
/// an operator dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Device {
    device_type: DeviceType,
    id: Option<usize>,
}

impl Device {
    #[inline(always)]
    pub fn cpu() -> Self {
        Self {
            device_type: DeviceType::Cpu,
            id: None,
        }
    }

    #[inline(always)]
    pub fn cuda(id: usize) -> Self {
        Self {
            device_type: DeviceType::Cuda,
            id: Some(id),
        }
    }

    #[inline(always)]
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    #[inline(always)]
    pub fn id(&self) -> Option<usize> {
        self.id
    }

    #[inline(always)]
    pub fn is_cpu(&self) -> bool {
        self.device_type == DeviceType::Cpu
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::cpu()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}:{}", self.device_type, id),
            None => write!(f, "{}", self.device_type),
        }
    }
}
