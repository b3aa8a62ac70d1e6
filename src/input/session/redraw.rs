use super::{DrawingSession, PendingRedraw};
use crate::draw::{Renderer, SurfaceError};
use crate::history::{DecodeCompletion, RedrawTicket};

impl DrawingSession {
    /// Repaints the current history entry through the viewport.
    ///
    /// The decode runs in the background; only the most recent request is
    /// ever applied.
    pub(super) fn request_redraw(&mut self) {
        let Some(snapshot) = self.history.current().cloned() else {
            return;
        };
        let ticket = self.history.next_ticket();
        if let Some(previous) = self.pending_redraw.replace(PendingRedraw {
            ticket,
            snapshot: snapshot.clone(),
        }) {
            log::debug!("Redraw {} superseded by {}", previous.ticket, ticket);
        }
        self.decoder.request(ticket, snapshot);
    }

    /// Ticket of the redraw still waiting for its decode, if any.
    pub fn pending_redraw(&self) -> Option<RedrawTicket> {
        self.pending_redraw.as_ref().map(|pending| pending.ticket)
    }

    /// Applies any decodes that have already finished, without waiting.
    ///
    /// Returns how many redraws were painted.
    pub fn poll_redraws(&mut self) -> Result<usize, SurfaceError> {
        let mut applied = 0;
        while let Some(completion) = self.decoder.try_next() {
            if self.apply_completion(completion)? {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Waits until the latest requested redraw has been painted.
    pub async fn settle(&mut self) -> Result<(), SurfaceError> {
        while self.pending_redraw.is_some() {
            let completion = self.decoder.next().await.ok_or(SurfaceError::DecoderGone)?;
            self.apply_completion(completion)?;
        }
        Ok(())
    }

    /// Paints a decode result if it answers the outstanding request.
    ///
    /// Returns `Ok(false)` for stale completions.
    pub(super) fn apply_completion(
        &mut self,
        completion: DecodeCompletion,
    ) -> Result<bool, SurfaceError> {
        let DecodeCompletion { ticket, result } = completion;
        if self.pending_redraw.as_ref().map(|pending| pending.ticket) != Some(ticket) {
            log::debug!("Dropping stale redraw {}", ticket);
            return Ok(false);
        }
        self.pending_redraw = None;

        let surface = result
            .and_then(|image| image.into_surface())
            .inspect_err(|err| log::warn!("Redraw {} abandoned: {}", ticket, err))?;
        self.renderer.draw_snapshot(&self.viewport, &surface)?;
        log::debug!("Redraw {} applied ({})", ticket, self.viewport.status_label());
        Ok(true)
    }

    /// Finishes an outstanding redraw on the spot so that new drawing lands
    /// on top of it; the background decode's reply is then ignored.
    pub(super) fn settle_pending_now(&mut self) -> Result<(), SurfaceError> {
        let Some(pending) = self.pending_redraw.take() else {
            return Ok(());
        };

        let surface = Renderer::decode_png(pending.snapshot.as_bytes())
            .inspect_err(|err| log::warn!("Redraw {} abandoned: {}", pending.ticket, err))?;
        self.renderer.draw_snapshot(&self.viewport, &surface)?;
        log::debug!("Redraw {} settled inline", pending.ticket);
        Ok(())
    }
}
