// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! External collaborators for the forgecfg engine: the subprocess runner,
//! the systemd control adapter, the asset filesystem abstraction, and
//! hostname/network fact resolution. Each follows the same trait + real
//! implementation + fake triad.

pub mod asset_fs;
pub mod env;
pub mod facts;
pub mod subprocess;
pub mod systemd;

pub use asset_fs::{AssetError, AssetKind, AssetMeta, AssetSource, EmbeddedAssetSource, LocalAssetSource};
pub use subprocess::{CommandOutput, RealSubprocessRunner, SubprocessError, SubprocessRunner};
pub use systemd::{RealSystemdAdapter, SystemdAdapter, SystemdError};

#[cfg(any(test, feature = "test-support"))]
pub use subprocess::{FakeSubprocessRunner, SubprocessCall};
#[cfg(any(test, feature = "test-support"))]
pub use systemd::FakeSystemdAdapter;
