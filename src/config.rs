use clap::Parser;

/// Provider tag assigned to files stored by this service.
pub const DEFAULT_NATIVE_PROVIDER: &str = "native";
/// The default address to listen on.
const DEFAULT_ADDRESS: &str = "0.0.0.0:42069";
/// Cookie checked for an access token before the `Authorization` header.
pub const ACCESS_TOKEN_COOKIE: &str = "lockbox_access_token";

#[derive(Debug, Parser)]
#[command(name = "lockbox", version = "0.1", about = "Project file metadata and checkouts", long_about = None)]
pub struct StartArgs {
    /// Database URL.
    #[arg(short, long)]
    db_url: Option<String>,

    /// RUST_LOG string to use as the env filter.
    #[arg(short, long)]
    log: Option<String>,

    /// Address to listen on.
    #[arg(short, long)]
    address: Option<String>,

    /// CORS allowed origins.
    #[arg(long)]
    cors_allowed_origins: Option<String>,

    /// Provider tag of the storage owned by this service. Only files of this
    /// provider can be checked out.
    #[arg(long)]
    native_provider: Option<String>,
}

/// Implement a getter method on [StartArgs], using the `$var` environment variable as a fallback
/// and either panic or default if neither the argument nor the environment variable is set.
macro_rules! arg {
    ($id:ident, $var:literal, panic $msg:literal) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => panic!($msg),
                    },
                }
            }
        }
    };
    ($id:ident, $var:literal, default $value:expr) => {
        impl StartArgs {
            pub fn $id(&self) -> String {
                match &self.$id {
                    Some(val) => val.to_string(),
                    None => match std::env::var($var) {
                        Ok(val) => val,
                        Err(_) => $value,
                    },
                }
            }
        }
    };
}

impl StartArgs {
    pub fn allowed_origins(&self) -> Vec<String> {
        let origins = match &self.cors_allowed_origins {
            Some(origins) => origins.clone(),
            None => std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        };
        split_list(&origins)
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter_map(|o| (!o.is_empty()).then_some(String::from(o)))
        .collect()
}

arg!(db_url,          "DATABASE_URL",    panic   "Database url not found; Pass --db-url or set DATABASE_URL");
arg!(log,             "RUST_LOG",        default "info".to_string());
arg!(address,         "ADDRESS",         default DEFAULT_ADDRESS.to_string());
arg!(native_provider, "NATIVE_PROVIDER", default DEFAULT_NATIVE_PROVIDER.to_string());
