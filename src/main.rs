use init::{config::AppConfig, logging::init_tracing, server_init::server_init_proc};
use tracing::info;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// modules tree
pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/build_info.rs"));
}
pub mod docs;
pub mod domain {
    pub mod auth {
        pub mod signup_code;
        pub mod user;
    }
}
pub mod dto {
    pub mod requests {
        pub mod auth {
            pub mod signup_request;
            pub mod signup_validate_request;
        }
    }
    pub mod responses {
        pub mod auth {
            pub mod signup_response;
            pub mod signup_validate_response;
        }
        pub mod response_data;
        pub mod response_meta;
    }
}
pub mod errors {
    pub mod code_error;
}
pub mod handlers {
    pub mod auth {
        pub mod signup;
        pub mod signup_validate;
    }
    pub mod fallback;
    pub mod server {
        pub mod healthcheck;
        pub mod root;
    }
}
pub mod init {
    pub mod config;
    pub mod logging;
    pub mod server_init;
    pub mod state;
}
pub mod jobs {
    pub mod auth {
        pub mod purge_expired_signup_codes;
    }
    pub mod job_funcs {
        pub mod every_minute;
        pub mod init_scheduler;
    }
}
pub mod routers {
    pub mod main_router;
    pub mod middleware {
        pub mod logging;
    }
}
pub mod util {
    pub mod crypto {
        pub mod signup_code;
    }
    pub mod email {
        pub mod emails;
        pub mod mailer;
    }
    pub mod extract {
        pub mod form;
    }
    pub mod string {
        pub mod validations;
    }
    pub mod time {
        pub mod duration_formatter;
        pub mod now;
    }
}

// main function
#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    let start = tokio::time::Instant::now();

    if std::env::var("IS_AWS").is_err() {
        // a missing .env is fine; the process env still applies
        let _ = dotenvy::dotenv();
    }

    let config = AppConfig::from_env()?;
    let _log_guard = init_tracing(&config)?;

    info!("Initializing server...");
    server_init_proc(start, config).await?;

    Ok(())
}
