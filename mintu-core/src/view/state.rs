use super::snapshot::Notification;
use crate::{
    carousel::Carousel,
    claim::TransactionConfirmation,
    progress::MintProgress,
    wallet::Balance,
};

/// Mutable per-view state. Only touched through `ViewShared::update`.
#[derive(Debug, Clone)]
pub(crate) struct ViewState {
    pub progress: MintProgress,
    pub carousel: Carousel,
    pub avatar: Option<String>,
    pub balance: Option<Balance>,
    pub transaction: Option<TransactionConfirmation>,
    pub notification: Option<Notification>,
}

impl ViewState {
    pub fn new(progress: MintProgress, carousel: Carousel) -> Self {
        Self {
            progress,
            carousel,
            avatar: None,
            balance: None,
            transaction: None,
            notification: None,
        }
    }
}
