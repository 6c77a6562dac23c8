use super::*;

/// The local consumer of bundles addressed to an endpoint.
#[async_trait]
pub trait ApplicationAgent: Send + Sync {
    /// The endpoint this agent is registered on.
    fn endpoint_id(&self) -> &Eid;

    /// Delivers a bundle to the application.
    async fn deliver(&self, bundle: &Bundle) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use drift_bpv7::prelude::{
        BlockControlFlags, BundleControlFlags, CanonicalBlock, CreationTimestamp, PrimaryBlock,
    };
    use std::sync::Mutex;

    struct Collector {
        eid: Eid,
        payloads: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl ApplicationAgent for Collector {
        fn endpoint_id(&self) -> &Eid {
            &self.eid
        }

        async fn deliver(&self, bundle: &Bundle) -> Result<()> {
            if bundle.primary.destination != self.eid {
                return Err(Error::Internal(
                    format!("{} is not addressed to {}", bundle.id(), self.eid).into(),
                ));
            }
            let payload = bundle.payload().ok_or(Error::InvalidBundle(
                drift_bpv7::Error::MissingPayload,
            ))?;
            self.payloads.lock().unwrap().push(payload.to_vec());
            Ok(())
        }
    }

    fn bundle_to(destination: &str) -> Bundle {
        Bundle::new(
            PrimaryBlock::new(
                BundleControlFlags::default(),
                destination.parse().unwrap(),
                "ipn:2.1".parse().unwrap(),
                CreationTimestamp::new(None, 0),
                60_000_000,
            ),
            vec![
                CanonicalBlock::new_bundle_age_block(1, BlockControlFlags::default(), 0),
                CanonicalBlock::new_payload_block(BlockControlFlags::default(), *b"ping"),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn deliver_through_trait_object() {
        let agent: Box<dyn ApplicationAgent> = Box::new(Collector {
            eid: "ipn:1.7".parse().unwrap(),
            payloads: Mutex::new(Vec::new()),
        });

        agent.deliver(&bundle_to("ipn:1.7")).await.unwrap();
        let err = agent.deliver(&bundle_to("ipn:1.8")).await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert!(!err.is_retryable());
        assert_eq!(agent.endpoint_id().to_string(), "ipn:1.7");
    }
}
