//! Application error types using thiserror
//!
//! Error hierarchy:
//! - InvalidArgument: a required request field is missing
//! - ManifestError: go.mod missing, unreadable or syntactically invalid
//! - RegistryError: module version-list lookup failed
//! - ImportError: the Go source tree could not be loaded for import rewriting
//! - IoError: file system operation failures
//! - ConfigError: invalid CLI / environment configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or nil required input
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Module repository lookup errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Import rewriting errors
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

impl AppError {
    /// Creates a new InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AppError::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Errors related to go.mod operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write manifest file
    #[error("failed to write manifest file {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// go.mod syntax error
    #[error("failed to parse go.mod at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The same module is required on more than one line
    #[error("go.mod line {line}: duplicate requirement for {module}")]
    DuplicateRequirement { module: String, line: usize },

    /// Version string is neither a semantic version nor a pseudo-version
    #[error("invalid version '{version}' for {module}")]
    InvalidVersion { module: String, version: String },
}

/// Errors related to module version lookup
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Module not known to the repository
    #[error("module '{module}' not found in {registry}")]
    ModuleNotFound { module: String, registry: String },

    /// Network request failed
    #[error("failed to fetch versions of '{module}' from {registry}: {message}")]
    NetworkError {
        module: String,
        registry: String,
        message: String,
    },

    /// Invalid response from the repository
    #[error("invalid response from {registry} for '{module}': {message}")]
    InvalidResponse {
        module: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{module}' from {registry}")]
    Timeout { module: String, registry: String },
}

/// Errors raised while loading or rewriting Go source files
#[derive(Error, Debug)]
pub enum ImportError {
    /// The source tree could not be walked or read
    #[error("failed to load packages under {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// A Go file could not be scanned for imports
    #[error("{path}:{line}: {message}")]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// GOPROXY holds no entry this helper can query
    #[error("no usable module proxy in GOPROXY '{value}'")]
    NoUsableProxy { value: String },

    /// Invalid path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },

    /// Request payload could not be decoded
    #[error("invalid request payload: {message}")]
    InvalidPayload { message: String },
}

/// Errors related to IO operations
#[derive(Error, Debug)]
pub enum IoError {
    /// Failed to read a file
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::WriteError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        ManifestError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Creates a new InvalidVersion error
    pub fn invalid_version(module: impl Into<String>, version: impl Into<String>) -> Self {
        ManifestError::InvalidVersion {
            module: module.into(),
            version: version.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new ModuleNotFound error
    pub fn module_not_found(module: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::ModuleNotFound {
            module: module.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        module: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            module: module.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        module: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            module: module.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(module: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            module: module.into(),
            registry: registry.into(),
        }
    }

    /// Returns true if the module simply has no published versions
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::ModuleNotFound { .. })
    }
}

impl ImportError {
    /// Creates a new Load error
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ImportError::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new Syntax error
    pub fn syntax(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        ImportError::Syntax {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidPayload error
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        ConfigError::InvalidPayload {
            message: message.into(),
        }
    }

    /// Creates a new InvalidPath error
    pub fn invalid_path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl IoError {
    /// Creates a new Read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Write {
            path: path.into(),
            source,
        }
    }
}
