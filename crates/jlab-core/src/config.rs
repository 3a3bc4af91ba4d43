//! Centralized configuration for jlab-core.
//!
//! Compile-time constants for conda environments, icon assets, browser
//! launching and network operations, plus the run-time [`SetupOptions`]
//! handed to the shortcut lifecycle.

use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "jlab-shortcut";
    pub const USER_AGENT: &'static str = "jlab-shortcut/0.3";
}

/// Conda environment configuration.
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Only channel used when creating new environments.
    pub const CHANNEL: &'static str = "conda-forge";

    /// Name of the per-environment directory menuinst reads specs from.
    pub const MENU_DIR_NAME: &'static str = "Menu";

    /// Directory under the base prefix that holds named environments.
    pub const ENVS_DIR_NAME: &'static str = "envs";

    /// Contents of the `.condarc` pinned into newly created environments.
    pub const CONDARC_LINES: [&'static str; 2] =
        ["pip_interop_enabled: true", "channels: [conda-forge]"];

    /// Packages every target environment must carry.
    ///
    /// `nb_conda_kernels` lets JupyterLab run notebooks in any conda
    /// environment with `ipykernel` installed.
    pub const REQUIRED_PACKAGES: [&'static str; 3] = ["jupyterlab", "nb_conda_kernels", "ipykernel"];

    /// Package set for freshly created environments.
    pub const NEW_ENV_PACKAGES: &'static [&'static str] = &[
        "jupyterlab",
        "nb_conda_kernels",
        "nbconvert",
        "jupyterlab-nbconvert-nocode",
        "jupyterlab-git",
        "jupyterlab-lsp",
        "jupyterlab_code_formatter",
        "jupyterlab-day",
        "jupyterlab-night",
        "jupyterlab_pygments",
        "black",
        "isort",
        "python-lsp-server",
        "ipykernel",
        "ipywidgets",
        "panel",
        "pandas",
        "numpy",
        "scipy",
        "statsmodels",
        "openpyxl",
        "tabulate",
        "matplotlib",
        "toolz",
        "more-itertools",
        "ipyparallel",
        "requests",
        "tqdm",
        "rich",
        "rich-with-jupyter",
        "sqlalchemy",
    ];

    /// Shortcut installer package and the minimum major version supported.
    pub const MENUINST_PACKAGE: &'static str = "menuinst";
    pub const MENUINST_MIN_MAJOR: u64 = 2;
    pub const MENUINST_REQUIREMENT: &'static str = "menuinst>=2.0.0";
}

/// File names staged into an environment's menu directory.
pub struct MenuFiles;

impl MenuFiles {
    pub const SHORTCUT_SPEC: &'static str = "jupyterlab_shortcut.json";
    pub const LAB_CONFIG: &'static str = "jupyter_lab_config.py";
    pub const ICON_STEM: &'static str = "jupyterlab";
}

/// Icon download locations.
pub struct IconConfig;

impl IconConfig {
    pub const WINDOWS_URL: &'static str = "https://raw.githubusercontent.com/jupyterlab/jupyterlab-desktop/master/dist-resources/icons/icon.ico";
    pub const LINUX_URL: &'static str = "https://raw.githubusercontent.com/jupyterlab/jupyterlab-desktop/master/dist-resources/icons/512x512.png";
    pub const MACOS_URL: &'static str = "https://raw.githubusercontent.com/jupyterlab/jupyterlab-desktop/8614277f274b0e9ee9cc550d194e4f02d0c5c3c7/dist-resources/icon.svg";

    /// Smallest and largest edge (as powers of two) rendered into a macOS iconset.
    pub const ICONSET_MIN_EXP: u32 = 4;
    pub const ICONSET_MAX_EXP: u32 = 10;
}

/// Browser launch configuration.
pub struct BrowserConfig;

impl BrowserConfig {
    /// Arguments appended to every browser command; `%s` receives the app URL.
    pub const APP_MODE_ARGS: &'static str = "--start-maximized --profile-directory=Default --app=%s";

    /// Jupyter runtime directory relative to home, exposed to Flatpak browsers.
    pub const JUPYTER_RUNTIME_DIR: &'static str = ".local/share/jupyter/runtime";

    /// Windows registry key holding the default `http` handler.
    pub const WINDOWS_HTTP_HANDLER_KEY: &'static str = r"HKCR\http\shell\open\command";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DOWNLOAD_TEMP_SUFFIX: &'static str = ".part";
}

/// Run-time options for one invocation of the shortcut lifecycle.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Name of the target conda environment.
    pub env_name: String,
    /// Remove the shortcut instead of creating it.
    pub remove: bool,
    /// Arguments to replay when the tool re-runs itself (excluding argv[0]).
    pub rerun_args: Vec<String>,
}

impl SetupOptions {
    /// Create options for creating a shortcut in `env_name`.
    pub fn new(env_name: impl Into<String>) -> Self {
        Self {
            env_name: env_name.into(),
            remove: false,
            rerun_args: Vec::new(),
        }
    }

    /// Request removal instead of creation.
    pub fn with_remove(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }

    /// Set the arguments used when re-running under the base prefix.
    pub fn with_rerun_args(mut self, args: Vec<String>) -> Self {
        self.rerun_args = args;
        self
    }
}
