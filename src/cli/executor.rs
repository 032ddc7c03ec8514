//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::sync::Arc;

use tracing::Instrument;

use super::handlers::database::DatabaseAction;
use super::handlers::{
    ConfigCommandHandler, DatabaseCommandHandler, MigrateCommandHandler, RunCommandHandler,
    WaitCommandHandler,
};
use super::parser::Commands;
use crate::config::Config;
use crate::error::AppResult;

/// Execute a CLI command with the resolved configuration
pub async fn execute_command(command: Commands, config: Arc<Config>) -> AppResult<()> {
    let span = tracing::info_span!("command", name = command_name(&command));
    dispatch(command, config).instrument(span).await
}

async fn dispatch(command: Commands, config: Arc<Config>) -> AppResult<()> {
    match command {
        Commands::Run => RunCommandHandler::new(config).execute().await,
        Commands::Migrate => MigrateCommandHandler::new(config).execute().await,
        Commands::Reset => {
            DatabaseCommandHandler::new(config)
                .execute(DatabaseAction::Reset)
                .await
        }
        Commands::CreateDb => {
            DatabaseCommandHandler::new(config)
                .execute(DatabaseAction::Create)
                .await
        }
        Commands::DropDb => {
            DatabaseCommandHandler::new(config)
                .execute(DatabaseAction::Drop)
                .await
        }
        Commands::Wait {
            allow_replica,
            max_attempts,
        } => {
            WaitCommandHandler::new(config)
                .execute(allow_replica, max_attempts)
                .await
        }
        Commands::Config => ConfigCommandHandler::new(config).execute(),
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Run => "run",
        Commands::Migrate => "migrate",
        Commands::Reset => "reset",
        Commands::CreateDb => "create-db",
        Commands::DropDb => "drop-db",
        Commands::Wait { .. } => "wait",
        Commands::Config => "config",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, EnvMap};
    use crate::error::AppError;
    use tempfile::TempDir;

    fn config(node_env: &str) -> Arc<Config> {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigLoader::with_env(EnvMap::from([
            ("NODE_ENV".to_string(), node_env.to_string()),
            (
                "DB_CONNECTION_STRING".to_string(),
                "postgres://app:pw@127.0.0.1:1/app".to_string(),
            ),
        ]))
        .with_config_dir(temp_dir.path())
        .with_dotenv_path(temp_dir.path().join(".env"))
        .load()
        .unwrap();
        Arc::new(config)
    }

    #[tokio::test]
    async fn test_execute_config() {
        assert!(execute_command(Commands::Config, config("test")).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_drop_refused() {
        let err = execute_command(Commands::DropDb, config("production"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DropDisabled { .. }));
    }

    #[tokio::test]
    async fn test_execute_bounded_wait() {
        let err = execute_command(
            Commands::Wait {
                allow_replica: false,
                max_attempts: Some(1),
            },
            config("test"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotReady { attempts: 1 }));
    }

    #[test]
    fn test_command_names() {
        assert_eq!(command_name(&Commands::CreateDb), "create-db");
        assert_eq!(
            command_name(&Commands::Wait {
                allow_replica: true,
                max_attempts: None
            }),
            "wait"
        );
    }
}
