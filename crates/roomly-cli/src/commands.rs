//! Subcommand definitions and dispatch.

use anyhow::bail;
use clap::Subcommand;

use roomly_core::{Gender, NewProperty, ProfileUpdate, PropertyFilter, PropertyUpdate, Registration};
use roomly_listings::ListingService;
use roomly_session::{GateDecision, SessionStore, UserDirectory};

use crate::output;

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Sign in and persist the session token.
    Login {
        /// Account username.
        username: String,
        /// Account password.
        password: String,
    },
    /// Sign out and forget the persisted token.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// Profile operations.
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Browse and manage listings.
    #[command(subcommand)]
    Listings(ListingsCommand),
    /// Administration (requires an admin account).
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

/// New-account fields.
#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    /// Desired username.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Contact phone number.
    #[arg(long)]
    pub phone_number: Option<String>,
    /// Preferred area to live in.
    #[arg(long)]
    pub preferred_location: Option<String>,
    /// Monthly budget.
    #[arg(long)]
    pub budget: Option<f64>,
    /// Roommate gender preference (male, female, any).
    #[arg(long)]
    pub preferred_gender: Option<Gender>,
}

/// Profile subcommands.
#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Update profile fields; only the flags you pass change.
    Update(ProfileArgs),
}

/// Sparse profile changes.
#[derive(clap::Args, Debug)]
pub struct ProfileArgs {
    /// New contact email.
    #[arg(long)]
    pub email: Option<String>,
    /// New contact phone number.
    #[arg(long)]
    pub phone_number: Option<String>,
    /// New preferred area.
    #[arg(long)]
    pub preferred_location: Option<String>,
    /// New monthly budget.
    #[arg(long)]
    pub budget: Option<f64>,
    /// New roommate gender preference.
    #[arg(long)]
    pub preferred_gender: Option<Gender>,
}

/// Listing subcommands.
#[derive(Subcommand, Debug)]
pub enum ListingsCommand {
    /// Browse listings, optionally narrowed by filter flags.
    Browse(BrowseArgs),
    /// Show a single listing.
    Show {
        /// Listing id.
        id: String,
    },
    /// List your own listings.
    Mine,
    /// Create a listing.
    Create(CreateArgs),
    /// Update an owned listing; only the flags you pass change.
    Update(UpdateArgs),
    /// Delete an owned listing.
    Delete {
        /// Listing id.
        id: String,
    },
}

/// Filter flags for browsing. No flags means all listings.
#[derive(clap::Args, Debug)]
pub struct BrowseArgs {
    /// Substring match on the listing location.
    #[arg(long)]
    pub location: Option<String>,
    /// Inclusive lower budget bound.
    #[arg(long)]
    pub min_budget: Option<f64>,
    /// Inclusive upper budget bound.
    #[arg(long)]
    pub max_budget: Option<f64>,
    /// Roommate gender preference (male, female, any).
    #[arg(long)]
    pub gender: Option<Gender>,
}

/// Fields for a new listing.
#[derive(clap::Args, Debug)]
pub struct CreateArgs {
    /// Short headline.
    #[arg(long)]
    pub title: String,
    /// Free-form description.
    #[arg(long)]
    pub description: String,
    /// Neighborhood or address text.
    #[arg(long)]
    pub location: String,
    /// Monthly rent.
    #[arg(long)]
    pub budget: f64,
    /// Roommate gender preference (male, female, any).
    #[arg(long)]
    pub preferred_gender: Gender,
}

/// Sparse listing changes.
#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Listing id.
    pub id: String,
    /// New headline.
    #[arg(long)]
    pub title: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New location text.
    #[arg(long)]
    pub location: Option<String>,
    /// New monthly rent.
    #[arg(long)]
    pub budget: Option<f64>,
    /// New roommate gender preference.
    #[arg(long)]
    pub preferred_gender: Option<Gender>,
}

/// Admin subcommands.
#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// User administration.
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

/// Admin user-management subcommands.
#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List every registered user.
    List,
    /// Delete a user account.
    Delete {
        /// Username of the account to delete.
        username: String,
    },
}

/// Dispatch a parsed command against the wired-up client stack.
pub async fn run(
    command: Command,
    session: &SessionStore,
    listings: &ListingService,
    directory: &UserDirectory,
) -> anyhow::Result<()> {
    match command {
        Command::Register(args) => {
            let user = session
                .register(Registration {
                    username: args.username,
                    email: args.email,
                    password: args.password,
                    phone_number: args.phone_number,
                    preferred_location: args.preferred_location,
                    budget: args.budget,
                    preferred_gender: args.preferred_gender,
                })
                .await?;
            println!("Registered and signed in as {}", user.username);
        }
        Command::Login { username, password } => {
            let user = session.login(&username, &password).await?;
            println!("Signed in as {} ({})", user.username, user.role);
        }
        Command::Logout => {
            session.logout();
            println!("Signed out");
        }
        Command::Whoami => match session.current_user() {
            Some(user) => output::print_user(&user),
            None => println!("Not signed in"),
        },
        Command::Profile { command } => match command {
            ProfileCommand::Update(args) => {
                ensure_authorized(session, false)?;
                let user = session
                    .update_profile(&ProfileUpdate {
                        email: args.email,
                        phone_number: args.phone_number,
                        preferred_location: args.preferred_location,
                        budget: args.budget,
                        preferred_gender: args.preferred_gender,
                    })
                    .await?;
                println!("Profile updated");
                output::print_user(&user);
            }
        },
        Command::Listings(command) => {
            run_listings(command, session, listings).await?;
        }
        Command::Admin { command } => {
            ensure_authorized(session, true)?;
            match command {
                AdminCommand::Users { command } => match command {
                    UsersCommand::List => {
                        let users = directory.all_users().await?;
                        output::print_users(&users);
                    }
                    UsersCommand::Delete { username } => {
                        directory.delete_user(&username).await?;
                        println!("User {username} deleted");
                    }
                },
            }
        }
    }

    Ok(())
}

/// Browsing and showing listings is open to anyone; only the owner-scoped
/// operations sit behind the gate.
async fn run_listings(
    command: ListingsCommand,
    session: &SessionStore,
    listings: &ListingService,
) -> anyhow::Result<()> {
    match command {
        ListingsCommand::Browse(args) => {
            let filter = PropertyFilter {
                location: args.location,
                min_budget: args.min_budget,
                max_budget: args.max_budget,
                preferred_gender: args.gender,
            };
            match listings.fetch(&filter).await? {
                Some(results) => output::print_properties(&results),
                // A single-shot CLI fetch is never superseded, but the
                // contract allows it.
                None => println!("Query superseded"),
            }
        }
        ListingsCommand::Show { id } => {
            let listing = listings.get(&id).await?;
            output::print_property(&listing);
        }
        ListingsCommand::Mine => {
            ensure_authorized(session, false)?;
            let mine = listings.my_listings().await?;
            output::print_properties(&mine);
        }
        ListingsCommand::Create(args) => {
            ensure_authorized(session, false)?;
            let created = listings
                .create(&NewProperty {
                    title: args.title,
                    description: args.description,
                    location: args.location,
                    budget: args.budget,
                    preferred_gender: args.preferred_gender,
                })
                .await?;
            println!("Listing created: {}", created.id);
        }
        ListingsCommand::Update(args) => {
            ensure_authorized(session, false)?;
            let updated = listings
                .update(
                    &args.id,
                    &PropertyUpdate {
                        title: args.title,
                        description: args.description,
                        location: args.location,
                        budget: args.budget,
                        preferred_gender: args.preferred_gender,
                    },
                )
                .await?;
            println!("Listing updated");
            output::print_property(&updated);
        }
        ListingsCommand::Delete { id } => {
            ensure_authorized(session, false)?;
            listings.delete(&id).await?;
            println!("Listing {id} deleted");
        }
    }

    Ok(())
}

fn ensure_authorized(session: &SessionStore, require_admin: bool) -> anyhow::Result<()> {
    match session.authorize(require_admin) {
        GateDecision::RenderProtected => Ok(()),
        GateDecision::RedirectToLogin => bail!("not signed in; run `roomly login` first"),
        GateDecision::RedirectToFallback => bail!("this command requires an administrator account"),
        GateDecision::RenderLoading => bail!("session is still resolving; try again"),
    }
}
