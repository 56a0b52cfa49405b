/// Application name used for data, cache and config directories
pub const APP_NAME: &str = "torchpkg";

/// Name of the packaged library
pub const PACKAGE_NAME: &str = "libtorch";

/// libtorch release fetched from upstream
pub const LIBTORCH_VERSION: &str = "1.9.0";

/// Upstream distribution root
pub const DEFAULT_MIRROR: &str = "https://download.pytorch.org/libtorch";

/// Upstream tag for CUDA builds (CUDA 11.1)
pub const CUDA_TAG: &str = "cu111";

/// Upstream tag for CPU-only builds
pub const CPU_TAG: &str = "cpu";

/// Environment variable overriding [`DEFAULT_MIRROR`]
pub const MIRROR_ENV: &str = "TORCHPKG_MIRROR";

/// Environment variable overriding the default package output root
pub const ROOT_ENV: &str = "TORCHPKG_ROOT";

/// Metadata file written at the package root
pub const PACKAGE_INFO_FILE: &str = "package_info.json";
