use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error, info,
    server::{CallbackServer, DEFAULT_CALLBACK_TIMEOUT},
    session::Session,
    success,
    types::{AuthReport, CallbackParams},
    warning,
    youtube::{AuthProvider, PlaylistApi},
};

/// Runs the authorization flow from the terminal.
///
/// Without `code`/`state` this is phase 1: the session produces the consent
/// url, a local callback server is started on the redirect url's address,
/// the browser is opened and the CLI waits for the redirect. The received
/// parameters are then handed back to the session (phase 2).
///
/// With `code` and `state` (copied from the browser's address bar), phase 2
/// runs directly against the nonce persisted by an earlier `auth` call.
pub fn auth<P: AuthProvider, A: PlaylistApi>(
    session: &mut Session<P, A>,
    reset: bool,
    open_browser: bool,
    code: Option<String>,
    state: Option<String>,
) {
    if reset {
        if let Err(e) = session.reset_auth() {
            error!("Cannot remove stored token: {}", e);
        }
        info!("Stored token removed.");
    }

    if code.is_some() || state.is_some() {
        let params = CallbackParams {
            code,
            state,
            error: None,
        };
        finish(session.auth(Some(&params)));
        return;
    }

    let report = session.auth(None);
    if report.success {
        success!("Already authenticated.");
        return;
    }

    let Some(url) = report.redirect_url else {
        error!("{}", report.message);
    };

    let addr = match session.config().callback_addr() {
        Ok(addr) => addr,
        Err(e) => error!("Cannot start callback server: {}", e),
    };
    let path = session.config().callback_path();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => error!("Cannot start async runtime: {}", e),
    };

    let received = runtime.block_on(async {
        let server = CallbackServer::bind(addr, &path).await?;

        if !open_browser || webbrowser::open(&url).is_err() {
            warning!("Open the following url in your browser to continue:\n{}", url);
        }

        let pb = ProgressBar::new_spinner();
        pb.set_message("Waiting for authorization in the browser...");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }

        let received = server.wait(DEFAULT_CALLBACK_TIMEOUT).await;
        pb.finish_and_clear();
        received
    });
    drop(runtime);

    match received {
        Ok(params) => finish(session.auth(Some(&params))),
        Err(e) => error!("Authentication failed: {}", e),
    }
}

fn finish(report: AuthReport) {
    if report.success {
        success!("Authentication successful!");
    } else {
        error!("Authentication failed: {}", report.message);
    }
}
