use crate::{error::ActionError, schema::Id};

/// The acting user of a request. Every read and write takes it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Viewer {
    Anonymous,
    User(Id),
}

impl Viewer {
    pub fn user_id(&self) -> Option<Id> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    /// Returns the acting user's id when they may perform `action`.
    pub fn authenticate(&self, action: ActionType) -> Result<Id, ActionError> {
        if !action.authenticate(self) {
            return Err(ActionError::Unauthenticated);
        }
        self.user_id().ok_or(ActionError::Unauthenticated)
    }

    pub fn is_author(&self, author_id: Id) -> bool {
        self.user_id() == Some(author_id)
    }
}

impl From<Option<Id>> for Viewer {
    fn from(value: Option<Id>) -> Self {
        match value {
            Some(id) => Viewer::User(id),
            None => Viewer::Anonymous,
        }
    }
}

const ANONYMOUS_ACTIONS: &[ActionType] = &[ActionType::ReadRecipes];

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionType {
    ReadRecipes,
    CreateRecipes,

    ManageOwnRecipes,
    ManageOwnFavorites,
    ManageOwnShoppingCart,
    ManageOwnSubscriptions,
}

impl ActionType {
    pub fn authenticate(self, viewer: &Viewer) -> bool {
        match viewer {
            Viewer::Anonymous => ANONYMOUS_ACTIONS.contains(&self),
            Viewer::User(_) => true,
        }
    }
}
