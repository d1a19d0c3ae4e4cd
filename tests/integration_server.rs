//! End-to-end walk through the session lifecycle over a real socket.
//!
//! The router is served on an ephemeral port and driven with `reqwest`, with
//! redirects disabled so every `Set-Cookie` can be inspected.

use anyhow::{Context, Result};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use sessionist::{
    api::{
        self,
        handlers::{AppState, Credentials},
    },
    session::SessionStore,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

struct TestServer {
    base: String,
    client: Client,
}

impl TestServer {
    async fn start() -> Result<Self> {
        let state = Arc::new(AppState::new(
            Arc::new(SessionStore::new()),
            Credentials::default(),
        ));
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .context("Failed to bind test listener")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, api::router(state).into_make_service()).await;
        });

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .context("Failed to build client")?;

        Ok(Self {
            base: format!("http://{addr}"),
            client,
        })
    }

    async fn view(&self, sid: Option<&str>) -> Result<Response> {
        let mut request = self.client.get(format!("{}/", self.base));
        if let Some(sid) = sid {
            request = request.header("Cookie", format!("sid={sid}"));
        }
        Ok(request.send().await?)
    }

    async fn submit(&self, path: &str, sid: Option<&str>, form: &str) -> Result<Response> {
        let mut request = self
            .client
            .post(format!("{}{path}", self.base))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(form.to_string());
        if let Some(sid) = sid {
            request = request.header("Cookie", format!("sid={sid}"));
        }
        Ok(request.send().await?)
    }
}

fn issued_sid(response: &Response) -> Option<String> {
    let value = response.headers().get("set-cookie")?.to_str().ok()?;
    value
        .split(';')
        .next()?
        .strip_prefix("sid=")
        .map(str::to_string)
}

#[tokio::test]
async fn session_lifecycle_rotates_on_every_identity_change() -> Result<()> {
    let server = TestServer::start().await?;

    // Anonymous visit
    let response = server.view(None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("text/html;charset=utf-8")
    );
    let t1 = issued_sid(&response).context("first visit must set sid")?;
    assert!(response.text().await?.contains("Not logged in."));

    // Reloading keeps the identifier
    let response = server.view(Some(&t1)).await?;
    assert!(issued_sid(&response).is_none());

    // Wrong password: no rotation
    let response = server
        .submit("/login", Some(&t1), "user=alice&pass=nope")
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(issued_sid(&response).is_none());
    assert!(response.text().await?.contains("Wrong credentials."));

    // Login
    let response = server
        .submit("/login", Some(&t1), "user=alice&pass=bob")
        .await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get("location")
            .and_then(|value| value.to_str().ok()),
        Some("/")
    );
    let t2 = issued_sid(&response).context("login must rotate sid")?;
    assert_ne!(t2, t1);

    let response = server.view(Some(&t2)).await?;
    assert!(issued_sid(&response).is_none());
    assert!(response.text().await?.contains("logged in as alice"));

    // Logout
    let response = server.submit("/logout", Some(&t2), "logout=true").await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let t3 = issued_sid(&response).context("logout must rotate sid")?;
    assert_ne!(t3, t2);
    assert_ne!(t3, t1);

    let response = server.view(Some(&t3)).await?;
    assert!(issued_sid(&response).is_none());
    assert!(response.text().await?.contains("Not logged in."));

    // Stale identifiers only lead to new anonymous sessions
    for stale in [t1.as_str(), t2.as_str()] {
        let response = server.view(Some(stale)).await?;
        let fresh = issued_sid(&response).context("stale sid must be replaced")?;
        assert_ne!(fresh, stale);
        assert!(response.text().await?.contains("Not logged in."));
    }

    Ok(())
}

#[tokio::test]
async fn malformed_submission_is_not_a_server_error() -> Result<()> {
    let server = TestServer::start().await?;

    for form in ["", "logout", "user=&pass=", "%%%", "user=alice"] {
        let response = server.submit("/login", None, form).await?;
        assert_eq!(response.status(), StatusCode::OK, "form {form:?}");
        assert!(response.text().await?.contains("Wrong credentials."));
    }

    // The server keeps serving afterwards
    let response = server.view(None).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
