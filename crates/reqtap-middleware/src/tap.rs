//! Top-level assembly: config plus collaborators -> shared `Instrumentor`.

use std::sync::Arc;

use reqtap_core::error::Result;
use reqtap_core::{Instrumentor, Logger, Stats};

use crate::adapt::{EventTap, FutureTap};
use crate::config::{IntegrationStyle, TapConfig};
use crate::logger::TracingLogger;

/// Configured middleware entry point.
///
/// Owns the shared `Instrumentor` and hands out adapters; which adapter
/// the embedding service mounts follows `style()`.
pub struct ReqTap {
    instr: Arc<Instrumentor>,
    style: IntegrationStyle,
}

impl ReqTap {
    pub fn builder(cfg: TapConfig) -> ReqTapBuilder {
        ReqTapBuilder {
            cfg,
            logger: None,
            stats: None,
        }
    }

    pub fn style(&self) -> IntegrationStyle {
        self.style
    }

    pub fn instrumentor(&self) -> Arc<Instrumentor> {
        Arc::clone(&self.instr)
    }

    pub fn event_tap(&self) -> EventTap {
        EventTap::new(Arc::clone(&self.instr))
    }

    pub fn future_tap(&self) -> FutureTap {
        FutureTap::new(Arc::clone(&self.instr))
    }
}

/// Builder injecting optional collaborators before assembly.
///
/// When no logger is supplied, a `TracingLogger` named
/// `"<service> [<env>]"` is constructed from the config. Stats stays
/// absent unless injected; the core then skips metric emission.
pub struct ReqTapBuilder {
    cfg: TapConfig,
    logger: Option<Arc<dyn Logger>>,
    stats: Option<Arc<dyn Stats>>,
}

impl ReqTapBuilder {
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn stats(mut self, stats: Arc<dyn Stats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> Result<ReqTap> {
        self.cfg.validate()?;
        let logger = self.logger.unwrap_or_else(|| {
            Arc::new(TracingLogger::new(
                &self.cfg.service.name,
                &self.cfg.service.env,
                self.cfg.service.log_level,
            ))
        });
        Ok(ReqTap {
            instr: Arc::new(Instrumentor::new(logger, self.stats)),
            style: self.cfg.style,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn minimal_cfg() -> TapConfig {
        config::load_from_str(
            r#"
version: 1
service:
  name: "checkout"
"#,
        )
        .expect("must parse")
    }

    #[test]
    fn builds_with_internal_logger() {
        let tap = ReqTap::builder(minimal_cfg()).build().expect("must build");
        assert_eq!(tap.style(), IntegrationStyle::Future);
    }

    #[test]
    fn style_follows_config() {
        let cfg = config::load_from_str(
            r#"
version: 1
service:
  name: "checkout"
style: event
"#,
        )
        .expect("must parse");
        let tap = ReqTap::builder(cfg).build().expect("must build");
        assert_eq!(tap.style(), IntegrationStyle::Event);
    }
}
