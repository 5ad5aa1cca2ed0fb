use tracing::warn;

use crate::app::{App, Message, Model, ResultsState, update};
use crate::search::Fetcher;

impl App {
    pub(super) fn handle_message_side_effects(
        model: &mut Model,
        fetcher: &Fetcher,
        msg: &Message,
    ) {
        if !matches!(msg, Message::Submit) {
            return;
        }
        let Some(query) = model.take_pending_query() else {
            return;
        };
        if let Err(err) = fetcher.submit(query.clone()) {
            warn!(error = %err, "could not start search worker");
            model.results = ResultsState::Failed {
                query,
                message: format!("Search unavailable: {err}"),
            };
        }
    }

    /// Feed finished fetches back through `update`.
    ///
    /// Returns `true` if anything arrived.
    pub(super) fn drain_fetch_outcomes(model: &mut Model, fetcher: &Fetcher) -> bool {
        let mut arrived = false;
        while let Some(outcome) = fetcher.try_recv() {
            arrived = true;
            let msg = Message::ResultsArrived {
                query: outcome.query,
                result: outcome.result.map_err(|err| err.to_string()),
            };
            *model = update(std::mem::take(model), msg);
        }
        arrived
    }
}
