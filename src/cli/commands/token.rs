use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::config::{load_client_config, save_client_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "User id placed in the `sub` claim")]
    pub user: String,

    #[arg(long, env = "JWT_SECRET", hide_env_values = true, help = "Secret shared with the server")]
    pub secret: String,

    #[arg(long, default_value_t = 24, help = "Lifetime in hours")]
    pub hours: u64,

    #[arg(long, help = "Store the token in the client config")]
    pub save: bool,
}

pub async fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let claims = Claims::new(&args.user, args.hours);
    let token = generate_jwt(&args.secret, &claims)?;

    if args.save {
        let mut config = load_client_config()?;
        config.token = Some(token.clone());
        save_client_config(&config)?;
    }

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "sub": claims.sub, "exp": claims.exp })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            if args.save {
                eprintln!("✓ Token saved for user {}", args.user);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: TokenArgs,
    }

    #[test]
    fn secret_flag_wins_and_hours_default() {
        let parsed = Wrapper::try_parse_from(["token", "--user", "user_alice", "--secret", "s3cret"]).unwrap();
        assert_eq!(parsed.args.user, "user_alice");
        assert_eq!(parsed.args.secret, "s3cret");
        assert_eq!(parsed.args.hours, 24);
        assert!(!parsed.args.save);
    }
}
