use super::{IChannelSender, INotifier, NotificationError};
use chime_domain::{Channel, Metadata};
use futures::future::join_all;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::{info, warn};

/// Routes messages to the sender registered for a channel
#[derive(Default)]
pub struct NotificationDispatcher {
    senders: RwLock<HashMap<Channel, Arc<dyn IChannelSender>>>,
}

impl NotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any sender previously registered for `channel`
    pub fn register(&self, channel: Channel, sender: Arc<dyn IChannelSender>) {
        info!(channel = %channel, sender = %sender.name(), "Registered notification channel");
        self.senders
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(channel, sender);
    }

    pub fn registered_channels(&self) -> Vec<Channel> {
        let mut channels = self
            .senders
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        channels.sort();
        channels
    }

    fn sender(&self, channel: &Channel) -> Option<Arc<dyn IChannelSender>> {
        self.senders
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(channel)
            .cloned()
    }

    /// Sends through every registered channel. Every failure is collected,
    /// a failing channel never stops the others.
    pub async fn broadcast(&self, user_id: i64, message: &str, metadata: &Metadata) -> Vec<NotificationError> {
        let mut senders = self
            .senders
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(channel, sender)| (channel.clone(), sender.clone()))
            .collect::<Vec<_>>();
        senders.sort_by(|a, b| a.0.cmp(&b.0));

        let results = join_all(senders.iter().map(|(_, sender)| sender.send(user_id, message, metadata))).await;

        senders
            .into_iter()
            .zip(results)
            .filter_map(|((channel, _), res)| match res {
                Ok(()) => None,
                Err(e) => {
                    warn!(channel = %channel, user_id, error = %e, "Broadcast to channel failed");
                    Some(e)
                }
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl INotifier for NotificationDispatcher {
    async fn send(&self, user_id: i64, channel: &Channel, message: &str) -> Result<(), NotificationError> {
        self.send_with_metadata(user_id, channel, message, &Metadata::new())
            .await
    }

    async fn send_with_metadata(
        &self,
        user_id: i64,
        channel: &Channel,
        message: &str,
        metadata: &Metadata,
    ) -> Result<(), NotificationError> {
        let sender = self
            .sender(channel)
            .ok_or_else(|| NotificationError::ChannelNotRegistered(channel.clone()))?;
        sender.send(user_id, message, metadata).await
    }
}
