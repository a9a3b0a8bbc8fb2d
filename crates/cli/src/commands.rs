//! CLI commands

use anyhow::{Result, bail};
use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use steamlite_core::{CategoryId, ClientConfig, GameId, UserId};
use steamlite_http::types::{BulkPriceAction, BulkPriceUpdate, NewGame, RegisterForm};
use steamlite_http::{ApiClient, FilePart, FileStorage};
use tracing::{debug, info};

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and save the session
    Login {
        email: String,
        #[arg(long, env = "STEAMLITE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create a customer account
    Register {
        username: String,
        email: String,
        #[arg(long, env = "STEAMLITE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Avatar image to upload with the account
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Browse and manage the catalog
    Games {
        #[command(subcommand)]
        command: GameCommands,
    },

    /// Buy a game
    Buy { game: GameId },

    /// Return a purchased game
    Return { game: GameId },

    /// List owned games
    Library {
        /// Include the detailed view with totals
        #[arg(long)]
        detailed: bool,
    },

    /// Review a game
    Review {
        game: GameId,
        /// 1 to 5
        rating: u8,
        comment: String,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Manage accounts
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Admin tooling
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum GameCommands {
    /// List games, optionally in one category
    List {
        #[arg(long)]
        category: Option<CategoryId>,
    },

    /// Show a game with its reviews
    Show {
        id: GameId,
        /// Use the aggregated detail view (related games, statistics)
        #[arg(long)]
        details: bool,
    },

    /// Search names and descriptions
    Search { query: String },

    /// Publish a game
    Create {
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        category: Option<CategoryId>,
    },

    /// Upload a cover image
    Image { id: GameId, path: PathBuf },

    /// Remove a game
    Delete { id: GameId },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    List,
    Add { name: String },
    Rename { id: CategoryId, name: String },
    Delete { id: CategoryId },
}

#[derive(Subcommand)]
pub enum UserCommands {
    List,
    Delete { id: UserId },
    /// Upload an avatar image
    Avatar { id: UserId, path: PathBuf },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Dashboard statistics
    Stats,

    /// Users, categories and games in one view
    Overview,

    /// Check every game for invalid data
    Validate,

    /// Change prices by a percentage
    BulkPrices {
        /// Percentage change, negative for a discount
        #[arg(long, allow_negative_numbers = true)]
        percentage: f64,
        #[arg(long)]
        category: Option<CategoryId>,
        /// Apply the change instead of only validating it
        #[arg(long)]
        apply: bool,
    },

    /// Notify users about a game release
    Notify { game: GameId },

    /// Run server-side image processing for a game
    ProcessImages { game: GameId },
}

impl Commands {
    pub async fn execute(self, config: &ClientConfig) -> Result<()> {
        let client = build_client(config).await?;

        match self {
            Self::Login { email, password } => {
                let user = client.login(&email, &password).await?;
                info!("Signed in as {}", user.name);
                print_json(&user)
            }
            Self::Logout => {
                client.logout().await?;
                println!("Signed out");
                Ok(())
            }
            Self::Whoami => match client.current_user() {
                Some(user) => print_json(&user),
                None => bail!("Not signed in"),
            },
            Self::Register {
                username,
                email,
                password,
                avatar,
            } => {
                let avatar = match avatar {
                    Some(path) => Some(FilePart::from_path(path).await?),
                    None => None,
                };
                let user = client
                    .register(RegisterForm {
                        username,
                        email,
                        password,
                        avatar,
                    })
                    .await?;
                print_json(&user)
            }
            Self::Games { command } => command.execute(&client).await,
            Self::Buy { game } => {
                ensure_customer(&client)?;
                client.purchase_game(game).await?;
                println!("Purchased game {game}");
                Ok(())
            }
            Self::Return { game } => {
                ensure_customer(&client)?;
                client.return_game(game).await?;
                println!("Returned game {game}");
                Ok(())
            }
            Self::Library { detailed } => {
                if detailed {
                    print_json(&client.library_detailed().await?)
                } else {
                    print_json(&client.library().await?)
                }
            }
            Self::Review {
                game,
                rating,
                comment,
            } => print_json(&client.create_review(game, rating, &comment).await?),
            Self::Categories { command } => command.execute(&client).await,
            Self::Users { command } => command.execute(&client).await,
            Self::Admin { command } => command.execute(&client).await,
        }
    }
}

impl GameCommands {
    async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::List { category } => print_json(&client.list_games(category).await?),
            Self::Show { id, details } => {
                if details {
                    print_json(&client.game_details(id).await?)
                } else {
                    print_json(&client.load_game_page(id).await?)
                }
            }
            Self::Search { query } => print_json(&client.search_games(&query).await?),
            Self::Create {
                name,
                price,
                description,
                category,
            } => {
                let game = client
                    .create_game(&NewGame {
                        name,
                        description,
                        price,
                        category_id: category,
                        developer_id: client.current_user().map(|user| user.id),
                    })
                    .await?;
                print_json(&game)
            }
            Self::Image { id, path } => {
                let image = FilePart::from_path(path).await?;
                print_json(&client.upload_game_image(id, image).await?)
            }
            Self::Delete { id } => {
                client.delete_game(id).await?;
                println!("Deleted game {id}");
                Ok(())
            }
        }
    }
}

impl CategoryCommands {
    async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::List => print_json(&client.list_categories().await?),
            Self::Add { name } => print_json(&client.create_category(&name).await?),
            Self::Rename { id, name } => print_json(&client.rename_category(id, &name).await?),
            Self::Delete { id } => {
                client.delete_category(id).await?;
                println!("Deleted category {id}");
                Ok(())
            }
        }
    }
}

impl UserCommands {
    async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::List => print_json(&client.list_users().await?),
            Self::Delete { id } => {
                client.delete_user(id).await?;
                println!("Deleted user {id}");
                Ok(())
            }
            Self::Avatar { id, path } => {
                let avatar = FilePart::from_path(path).await?;
                print_json(&client.upload_avatar(id, avatar).await?)
            }
        }
    }
}

impl AdminCommands {
    async fn execute(self, client: &ApiClient) -> Result<()> {
        match self {
            Self::Stats => print_json(&client.dashboard_stats().await?),
            Self::Overview => print_json(&client.load_admin_overview().await?),
            Self::Validate => print_json(&client.validate_all_games().await?),
            Self::BulkPrices {
                percentage,
                category,
                apply,
            } => {
                let update = BulkPriceUpdate {
                    category_id: category,
                    action: if apply {
                        BulkPriceAction::UpdatePrices
                    } else {
                        BulkPriceAction::Validate
                    },
                    percentage,
                };
                print_json(&client.bulk_update_prices(&update).await?)
            }
            Self::Notify { game } => print_json(&client.notify_game_release(game).await?),
            Self::ProcessImages { game } => {
                print_json(&client.process_game_images(game).await?)
            }
        }
    }
}

async fn build_client(config: &ClientConfig) -> Result<ApiClient> {
    let dir = config.storage.resolved_dir();
    debug!(dir = %dir.display(), "using session directory");

    let client = ApiClient::builder()
        .config(config)
        .storage(Arc::new(FileStorage::new(dir)))
        .build()?;
    client.restore_session().await?;
    Ok(client)
}

/// Buying and returning are for customer accounts
fn ensure_customer(client: &ApiClient) -> Result<()> {
    match client.current_user() {
        Some(user) if !user.can_purchase() => {
            bail!("{} accounts cannot buy or return games", user.role.as_str())
        }
        _ => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
