use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_http::services::ServeDir;

use crate::ServeArgs;
use crate::finder::{Finder, FinderError, Page};

/// Shared state for request handlers.
struct AppState {
    finder: Finder,
    base: tera::Context,
}

pub async fn run(args: &ServeArgs) -> Result<(), anyhow::Error> {
    let (config, base_path, finder, base) = super::setup(args.config_file.as_deref())?;

    let root_display = finder.root().display().to_string();
    let state = Arc::new(AppState { finder, base });

    let mut app = Router::new().fallback(handle_request).with_state(state);

    // Optional static assets directory, served as-is
    if let Some(assets) = &config.assets {
        let assets_dir = if assets.is_relative() {
            base_path.join(assets)
        } else {
            assets.clone()
        };
        app = app.nest_service("/static", ServeDir::new(assets_dir));
    }

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;

    // Determine the URL to display
    let display_host = if args.bind == "0.0.0.0" {
        "localhost"
    } else {
        &args.bind
    };
    let url = format!("http://{}:{}", display_host, args.port);

    println!("Serving {} at {}", root_display, url);
    println!("Press Ctrl+C to stop\n");

    // Open browser if requested
    if args.open {
        if let Err(e) = open::that(&url) {
            eprintln!("Failed to open browser: {}", e);
        }
    }

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Resolve every request path through the finder.
async fn handle_request(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let path = uri.path();

    let mut context = state.base.clone();
    context.insert("path", path);

    match state.finder.resolve(path, &context) {
        Ok(Page::Rendered(html)) => Html(html).into_response(),
        Ok(Page::Redirect(location)) => Redirect::temporary(&location).into_response(),
        Err(error) => error_response(path, &error),
    }
}

/// Map finder errors to HTTP responses.
///
/// A Markdown page without a wrapper template is not a valid page and is
/// indistinguishable from a missing one to clients. Traversal attempts also
/// surface as 404 so the filesystem layout is not leaked, but are logged
/// distinctly.
fn error_response(path: &str, error: &FinderError) -> Response {
    match error {
        FinderError::NotFound { .. } => not_found(path),
        FinderError::MissingWrapper { .. } => {
            tracing::debug!(path, %error, "markdown page without wrapper_template");
            not_found(path)
        }
        FinderError::Traversal { .. } => {
            tracing::warn!(path, %error, "rejected path traversal");
            not_found(path)
        }
        _ => {
            tracing::error!(path, %error, "failed to render page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".to_string(),
            )
                .into_response()
        }
    }
}

fn not_found(path: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Can't find template for {}", path),
    )
        .into_response()
}
