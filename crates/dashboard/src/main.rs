//! `prodboard` terminal entry point.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use prodboard_auth::{AuthGuard, LocalStorage, MemoryStorage, SqliteStorage};
use prodboard_dashboard::controller::ROOT_ROUTE;
use prodboard_dashboard::render::RenderState;
use prodboard_dashboard::shell::{self, Command, DASHBOARD_ROUTE, Outcome, ShellContext};
use prodboard_dashboard::{
    Cli, DashboardConfig, HttpProductsApi, InMemoryProductsApi, Navigator, ProductsApi, ProductsController,
    ProductsStore, RouteHistory, StorageLocation, TerminalConfirm,
};

type Controller =
    ProductsController<Arc<dyn ProductsApi>, Arc<dyn LocalStorage>, TerminalConfirm, RouteHistory>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.config().context("invalid configuration")?;
    prodboard_observability::init_with(config.log_format);

    let api = products_api(&config, cli.demo);
    let storage = local_storage(&config.storage)?;
    let mut routes = RouteHistory::starting_at(DASHBOARD_ROUTE);

    loop {
        let mut controller = ProductsController::new(
            ProductsStore::new(api.clone()).with_page_size(config.page_size),
            AuthGuard::new(storage.clone()),
            TerminalConfirm,
            routes,
        );
        controller.mount().await;
        if !controller.auth().is_authenticated() && controller.navigator().current() != ROOT_ROUTE {
            controller.navigator_mut().navigate(ROOT_ROUTE);
        }

        let outcome = run(&mut controller).await?;
        routes = controller.navigator().clone();
        if outcome != Outcome::Reload {
            break;
        }
        tracing::info!("rebuilding dashboard");
    }

    Ok(())
}

fn products_api(config: &DashboardConfig, demo: bool) -> Arc<dyn ProductsApi> {
    if demo {
        tracing::info!("using in-memory demo catalog");
        return Arc::new(InMemoryProductsApi::demo());
    }
    match &config.auth_token {
        Some(token) => {
            tracing::info!("using products API at {} with authentication token", config.api_url);
            Arc::new(HttpProductsApi::with_token(config.api_url.clone(), token.clone()))
        }
        None => {
            tracing::info!("using products API at {} without authentication token", config.api_url);
            Arc::new(HttpProductsApi::new(config.api_url.clone()))
        }
    }
}

fn local_storage(location: &StorageLocation) -> anyhow::Result<Arc<dyn LocalStorage>> {
    let storage: Arc<dyn LocalStorage> = match location {
        StorageLocation::Memory => Arc::new(MemoryStorage::new()),
        StorageLocation::Sqlite(target) if target.starts_with("sqlite:") => {
            Arc::new(SqliteStorage::new(target.clone()))
        }
        StorageLocation::Sqlite(path) => Arc::new(SqliteStorage::at_path(path)),
        StorageLocation::Default => {
            Arc::new(SqliteStorage::default_location().context("failed to locate local storage")?)
        }
    };
    Ok(storage)
}

fn shell_context(controller: &Controller) -> ShellContext {
    if controller.navigator().current() == ROOT_ROUTE {
        ShellContext::LoginPage
    } else if matches!(controller.render_state(), RenderState::Error(_)) {
        ShellContext::ErrorScreen
    } else {
        ShellContext::Dashboard
    }
}

async fn run(controller: &mut Controller) -> anyhow::Result<Outcome> {
    let mut line = String::new();

    loop {
        let context = shell_context(controller);
        match context {
            ShellContext::LoginPage => println!("Signed out. Type `login` to sign in or `quit` to exit."),
            ShellContext::ErrorScreen => {
                println!("{}", controller.view());
                println!("Type `reload` to try again or `quit` to exit.");
            }
            ShellContext::Dashboard => println!("{}", controller.view()),
        }

        print!("> ");
        std::io::stdout().flush().context("failed to write prompt")?;

        line.clear();
        if std::io::stdin().read_line(&mut line).context("failed to read command")? == 0 {
            return Ok(Outcome::Quit);
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if !command.allowed_in(context) {
            println!("`{}` is not available here (try `help`)", line.trim());
            continue;
        }

        match shell::execute(controller, command).await {
            Outcome::Continue => {}
            Outcome::Notice(message) => println!("{message}"),
            outcome @ (Outcome::Reload | Outcome::Quit) => return Ok(outcome),
        }
    }
}
