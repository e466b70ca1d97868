//! liveink demo: presenter and audience in one process.
//!
//! - Presenter deck with notes and a speaker-only element
//! - Page loaded with `?notes`, so the audience window opens on load
//! - Audience window whose script loads late (connects must be retried)
//! - Navigation, a reveal, then the mirrored audience view is logged

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use liveink_core::element::{ElementId, NodeClass};
use liveink_core::error::{LiveInkError, Result};
use liveink_core::protocol::SlideNotes;
use liveink_sync::input::{HostEvent, InputAdapter, MenuItem};
use liveink_sync::obs::SyncMetrics;
use liveink_sync::presentation::{DeckSlide, Location, ScriptedDeck};
use liveink_sync::transport::LocalHub;
use liveink_sync::{config, AudienceResponder, PresenterSession, SyncContext};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1);
    let cfg = match path.as_deref() {
        Some(p) => config::load_from_file(p)?,
        None => config::SyncConfig::default(),
    };
    let retry = cfg.presenter.retry_interval();

    let location = Location::parse("http://localhost:8000/index.html?notes#/0")
        .ok_or_else(|| LiveInkError::Internal("bad demo location".into()))?;
    let deck = Arc::new(
        ScriptedDeck::new(
            vec![
                DeckSlide {
                    notes: SlideNotes::from_block("Welcome everyone.", false),
                    fragments: 0,
                },
                DeckSlide {
                    notes: SlideNotes::from_attribute("Keep it short.\n  Then demo."),
                    fragments: 2,
                },
                DeckSlide {
                    notes: SlideNotes::from_block("- recap\n- questions", true),
                    fragments: 0,
                },
            ],
            location.clone(),
        )
        .with_nodes(vec![
            NodeClass::Content,
            NodeClass::Content,
            NodeClass::SpeakerOnly,
            NodeClass::Content,
        ])
        .with_script_src("http://localhost:8000/plugin/liveink/live.js"),
    );

    let hub = LocalHub::new(cfg.channel.capacity);
    let metrics = Arc::new(SyncMetrics::default());
    let window_name = cfg.presenter.window_name.clone();

    let ctx = SyncContext::new(
        cfg.clone(),
        Arc::new(hub.endpoint("presenter")),
        deck.clone(),
        Arc::clone(&metrics),
    );
    let mut session = PresenterSession::new(ctx);

    let Some(adapter) = InputAdapter::install(&cfg.presenter, &location) else {
        return Ok(());
    };
    let (key, label) = adapter.help_entry();
    tracing::info!(%key, label, "keyboard shortcut registered");

    // `?notes` opens the audience window as soon as the deck has loaded
    adapter.dispatch(&mut session, &HostEvent::Load)?;

    // the audience script comes up a few retry intervals later
    tokio::time::sleep(retry * 3).await;
    let audience = AudienceResponder::new(Arc::new(hub.endpoint(&window_name)), Arc::clone(&metrics));
    let view = audience.view();
    let listener = audience.spawn();

    if !session.connected().await {
        return Err(LiveInkError::Internal("session ended before connecting".into()));
    }

    deck.goto(1);
    deck.next_fragment();
    deck.goto(2);

    adapter.dispatch(
        &mut session,
        &HostEvent::ContextMenu {
            target: ElementId::new(2),
            ctrl: false,
            x: 120,
            y: 80,
        },
    )?;
    adapter.dispatch(&mut session, &HostEvent::MenuClick(MenuItem::Reveal))?;

    tokio::time::sleep(Duration::from_millis(50)).await;

    let shown = view.borrow().clone();
    tracing::info!(
        url = ?shown.url,
        position = ?shown.position,
        notes = %shown.notes,
        markdown = shown.markdown,
        revealed = shown.elements.len(),
        "audience view"
    );
    println!("{}", metrics.render());

    session.close();
    listener.abort();
    Ok(())
}
