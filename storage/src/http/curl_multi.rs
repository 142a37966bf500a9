use std::time::Duration;

use curl::multi::{Easy2Handle, Multi};

use crate::http::curl_handle::{Callbacks, CurlHandle, PauseMask};
use crate::http::Error;

const WAIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Runs one transfer on a multi handle so that the caller decides when to make progress.
pub(crate) struct MultiDriver {
    handle: Option<Easy2Handle<Callbacks>>,
    multi: Multi,
    result: Option<Result<(), curl::Error>>,
}

impl MultiDriver {
    pub(crate) fn start(handle: CurlHandle) -> Result<Self, Error> {
        let multi = Multi::new();
        let handle = multi
            .add2(handle.into_easy())
            .map_err(|e| Error::multi("add_handle", e))?;
        Ok(Self {
            handle: Some(handle),
            multi,
            result: None,
        })
    }

    /// `true` once libcurl reported the transfer as finished.
    pub(crate) fn is_done(&self) -> bool {
        self.result.is_some()
    }

    /// Drives the transfer until `ready` holds or the transfer finishes.
    pub(crate) fn pump(&mut self, mut ready: impl FnMut() -> bool) -> Result<(), Error> {
        while self.result.is_none() {
            self.multi.perform().map_err(|e| Error::multi("perform", e))?;
            self.collect_result();
            if self.result.is_some() || ready() {
                break;
            }
            self.multi
                .wait(&mut [], WAIT_TIMEOUT)
                .map_err(|e| Error::multi("wait", e))?;
        }
        Ok(())
    }

    /// Resumes directions paused by the callbacks. A finished transfer has nothing to resume.
    pub(crate) fn resume(&mut self, mask: PauseMask) -> Result<(), Error> {
        if self.result.is_some() {
            return Ok(());
        }
        if let Some(handle) = self.handle.as_mut() {
            let (recv, send) = handle.get_mut().apply_pause(mask);
            if recv {
                handle.unpause_write().map_err(|e| Error::transport("resume", e))?;
            }
            if send {
                handle.unpause_read().map_err(|e| Error::transport("resume", e))?;
            }
        }
        Ok(())
    }

    /// Runs the transfer to completion and returns the session.
    pub(crate) fn finish(&mut self, site: &str) -> Result<CurlHandle, Error> {
        self.pump(|| false)?;
        let handle = self
            .handle
            .take()
            .ok_or_else(|| Error::transfer("finish", "transfer already finished"))?;
        let easy = self.multi.remove2(handle).map_err(|e| Error::multi("remove_handle", e))?;
        let mut handle = CurlHandle::from_easy(easy);
        handle.flush_debug(site);
        match self.result.take() {
            Some(Err(e)) => Err(Error::transport("perform", e)),
            _ => Ok(handle),
        }
    }

    /// Detaches the transfer without running it to completion. Whatever libcurl still holds for
    /// the transfer is discarded with the easy handle.
    pub(crate) fn abort(&mut self, site: &str) -> Result<(), Error> {
        if let Some(handle) = self.handle.take() {
            let easy = self.multi.remove2(handle).map_err(|e| Error::multi("remove_handle", e))?;
            CurlHandle::from_easy(easy).flush_debug(site);
        }
        self.result = None;
        Ok(())
    }

    fn collect_result(&mut self) {
        let Self { handle, multi, result } = self;
        if let Some(handle) = handle.as_ref() {
            multi.messages(|message| {
                if let Some(r) = message.result_for2(handle) {
                    *result = Some(r);
                }
            });
        }
    }
}
