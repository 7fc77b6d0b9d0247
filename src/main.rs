//! Host-side helper: `cargo run` optionally builds the WASM bundle and serves
//! the staged site with the same locale routing as production.

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> std::io::Result<()> {
    server::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod server {
    use std::net::SocketAddr;
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use std::sync::Arc;

    use axum::{
        body::Body,
        extract::State,
        http::{header, Request, StatusCode, Uri},
        middleware::{self, Next},
        response::{IntoResponse, Redirect, Response},
        Router,
    };
    use clap::Parser;
    use everywhere_site::site::{RouteDecision, RoutingConfig};
    use tower_http::services::{ServeDir, ServeFile};
    use tracing::{debug, error, info, warn};
    use tracing_subscriber::EnvFilter;

    #[derive(Parser, Debug)]
    #[command(about = "Serve the Everywhere site locally")]
    struct Args {
        /// Directory holding the staged site (index.html, 404.html, pkg/)
        #[arg(long, env = "SITE_ROOT", default_value = "dist")]
        root: PathBuf,

        #[arg(long, env = "PORT", default_value_t = 8000)]
        port: u16,

        /// Run `wasm-pack` into `<root>/pkg` before serving
        #[arg(long)]
        build: bool,
    }

    pub async fn run() -> std::io::Result<()> {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();

        let args = Args::parse();
        if args.build {
            build_wasm(&args.root);
        }
        if !args.root.join("index.html").exists() {
            warn!(root = %args.root.display(), "no index.html in site root; run `cargo build` to stage static/");
        }

        let app = router(&args.root, RoutingConfig::default());
        let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("serving {} at http://{addr}", args.root.display());
        axum::serve(listener, app).await
    }

    fn build_wasm(root: &Path) {
        let out_dir = root.join("pkg");
        info!("building WASM pkg into {}", out_dir.display());
        match Command::new("wasm-pack")
            .args(["build", "--release", "--target", "web", "--out-dir"])
            .arg(&out_dir)
            .status()
        {
            Ok(st) if st.success() => {}
            Ok(st) => {
                error!(%st, "wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
                std::process::exit(1);
            }
            Err(e) => {
                warn!("wasm-pack not found in PATH ({e}). Skipping wasm build; the site may serve stale artifacts.");
            }
        }
    }

    pub(crate) fn router(root: &Path, routing: RoutingConfig) -> Router {
        // unknown files answer 404 with the localized not-found page
        let serve_dir = ServeDir::new(root).not_found_service(ServeFile::new(root.join("404.html")));

        Router::new()
            .fallback_service(serve_dir)
            .layer(middleware::from_fn_with_state(Arc::new(routing), locale_routing))
    }

    /// Redirects bare page paths to a locale and serves `/{locale}/…` from the
    /// unprefixed files.
    async fn locale_routing(
        State(routing): State<Arc<RoutingConfig>>,
        mut request: Request<Body>,
        next: Next,
    ) -> Response {
        let accept_language = request
            .headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        let decision = routing.route(request.uri().path(), request.uri().query(), accept_language);

        match decision {
            RouteDecision::Skip => next.run(request).await,
            RouteDecision::Redirect(location) => Redirect::temporary(&location).into_response(),
            RouteDecision::Pass { locale, rest } => {
                let target = match request.uri().query() {
                    Some(query) => format!("{rest}?{query}"),
                    None => rest,
                };
                let Ok(uri) = target.parse::<Uri>() else {
                    return StatusCode::BAD_REQUEST.into_response();
                };
                debug!(%locale, from = %request.uri(), to = %uri, "locale rewrite");
                *request.uri_mut() = uri;
                next.run(request).await
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use tower::ServiceExt;

        fn site(name: &str) -> PathBuf {
            let dir = std::env::temp_dir().join(format!("everywhere-site-{}-{name}", std::process::id()));
            std::fs::create_dir_all(dir.join("download")).unwrap();
            std::fs::write(dir.join("index.html"), "home").unwrap();
            std::fs::write(dir.join("download/index.html"), "download").unwrap();
            std::fs::write(dir.join("404.html"), "missing").unwrap();
            std::fs::write(dir.join("app.js"), "js").unwrap();
            dir
        }

        async fn get(app: Router, path: &str, lang: Option<&str>) -> Response {
            let mut req = Request::builder().uri(path);
            if let Some(lang) = lang {
                req = req.header(header::ACCEPT_LANGUAGE, lang);
            }
            app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
        }

        #[tokio::test]
        async fn bare_path_redirects_to_negotiated_locale() {
            let app = router(&site("redirect"), RoutingConfig::default());
            let res = get(app, "/download/?from=nav", Some("zh-CN,zh;q=0.9")).await;
            assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(res.headers()[header::LOCATION], "/zh-CN/download/?from=nav");
        }

        #[tokio::test]
        async fn locale_prefix_serves_unprefixed_page() {
            let app = router(&site("prefix"), RoutingConfig::default());
            let res = get(app, "/en-US/download/", None).await;
            assert_eq!(res.status(), StatusCode::OK);
            let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"download");
        }

        #[tokio::test]
        async fn assets_skip_routing() {
            let app = router(&site("assets"), RoutingConfig::default());
            let res = get(app, "/app.js", Some("zh-CN")).await;
            assert_eq!(res.status(), StatusCode::OK);
        }

        #[tokio::test]
        async fn unknown_page_is_404_with_page_body() {
            let app = router(&site("missing"), RoutingConfig::default());
            let res = get(app, "/en-US/nope", None).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND);
            let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"missing");
        }
    }
}
