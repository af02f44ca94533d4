//! Navigation shell: which screen is showing, what it loads on entry and
//! where "back" goes.

use time::Date;
use tracing::{debug, warn};

use crate::dashboard::{expiry_alerts, DashboardSummary, ExpiryAlert};
use crate::error::ActionError;
use crate::inventory::{InventoryController, InventoryForm, InventoryItem};
use crate::items::ItemService;
use crate::profile::{ProfileController, UserProfile};
use crate::shopping::{ShoppingController, ShoppingForm, ShoppingItem};
use crate::state::AppState;
use crate::ui::Prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    ProfileForm,
    Dashboard,
    Notifications,
    MenuRecommendation,
    WeeklyShopping,
    AddShoppingItem,
    EditShoppingItem(u64),
    Inventory,
    AddInventoryItem,
    EditInventoryItem(u64),
    InventoryItemDetail(u64),
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            Self::ProfileForm => "Complete your profile",
            Self::Dashboard => "Dashboard",
            Self::Notifications => "Notifications",
            Self::MenuRecommendation => "Menu recommendation",
            Self::WeeklyShopping => "Weekly shopping",
            Self::AddShoppingItem => "Add shopping item",
            Self::EditShoppingItem(_) => "Edit shopping item",
            Self::Inventory => "Your pantry",
            Self::AddInventoryItem => "Add pantry item",
            Self::EditInventoryItem(_) => "Edit pantry item",
            Self::InventoryItemDetail(_) => "Pantry item",
        }
    }

    pub fn back(self) -> View {
        match self {
            Self::AddShoppingItem | Self::EditShoppingItem(_) => Self::WeeklyShopping,
            Self::AddInventoryItem | Self::EditInventoryItem(_) | Self::InventoryItemDetail(_) => {
                Self::Inventory
            }
            _ => Self::Dashboard,
        }
    }
}

pub struct App {
    pub view: View,
    pub profile: ProfileController,
    pub inventory: InventoryController,
    pub shopping: ShoppingController,
    pub inventory_form: InventoryForm,
    pub shopping_form: ShoppingForm,
}

impl App {
    pub fn new(state: &AppState) -> Self {
        Self {
            view: View::ProfileForm,
            profile: ProfileController::new(ItemService::new(state.store.clone())),
            inventory: InventoryController::new(ItemService::new(state.store.clone())),
            shopping: ShoppingController::new(ItemService::new(state.store.clone())),
            inventory_form: InventoryForm::default(),
            shopping_form: ShoppingForm::default(),
        }
    }

    /// Shows `view` and loads what it needs. A failed load leaves the
    /// screen up with its message set; a missing edit or detail target
    /// falls back to the owning list.
    pub async fn navigate(&mut self, view: View, prompt: &dyn Prompt) -> Result<(), ActionError> {
        debug!(from = ?self.view, to = ?view, "navigate");
        self.view = view;
        match view {
            View::ProfileForm => self.profile.load().await.map(|_| ()),
            View::Dashboard => {
                let profile = self.profile.load().await.map(|_| ());
                let inventory = self.inventory.load().await;
                let shopping = self.shopping.load().await;
                profile?;
                inventory?;
                shopping?;
                Ok(())
            }
            View::Notifications | View::Inventory => Ok(self.inventory.load().await?),
            View::WeeklyShopping => Ok(self.shopping.load().await?),
            View::MenuRecommendation => Ok(()),
            View::AddInventoryItem => {
                self.inventory_form = InventoryForm::default();
                Ok(())
            }
            View::AddShoppingItem => {
                self.shopping_form = ShoppingForm::default();
                Ok(())
            }
            View::EditInventoryItem(id) => match self.inventory.open_edit(id, prompt).await {
                Ok(form) => {
                    self.inventory_form = form;
                    Ok(())
                }
                Err(e) => {
                    self.view = View::Inventory;
                    Err(e)
                }
            },
            View::EditShoppingItem(id) => match self.shopping.open_edit(id, prompt).await {
                Ok(form) => {
                    self.shopping_form = form;
                    Ok(())
                }
                Err(e) => {
                    self.view = View::WeeklyShopping;
                    Err(e)
                }
            },
            View::InventoryItemDetail(id) => {
                if self.inventory.find(id).is_err() {
                    self.inventory.load().await?;
                }
                if let Err(e) = self.inventory.find(id) {
                    warn!(id, "detail target missing");
                    self.view = View::Inventory;
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    pub async fn back(&mut self, prompt: &dyn Prompt) -> Result<(), ActionError> {
        self.navigate(self.view.back(), prompt).await
    }

    /// Saves the profile buffer and moves on to the dashboard.
    pub async fn save_profile(&mut self, prompt: &dyn Prompt) -> Result<UserProfile, ActionError> {
        let saved = self.profile.submit(prompt).await?.clone();
        self.view = View::Dashboard;
        Ok(saved)
    }

    /// Saves the inventory buffer. On success the list view comes back with
    /// the patched collection; it is not refetched.
    pub async fn save_inventory(&mut self, prompt: &dyn Prompt) -> Result<InventoryItem, ActionError> {
        let saved = self.inventory.submit(&self.inventory_form, prompt).await?;
        self.inventory_form = InventoryForm::default();
        self.view = View::Inventory;
        Ok(saved)
    }

    pub async fn save_shopping(&mut self, prompt: &dyn Prompt) -> Result<ShoppingItem, ActionError> {
        let saved = self.shopping.submit(&self.shopping_form, prompt).await?;
        self.shopping_form = ShoppingForm::default();
        self.view = View::WeeklyShopping;
        Ok(saved)
    }

    pub async fn delete_inventory(&mut self, id: u64, prompt: &dyn Prompt) -> Result<bool, ActionError> {
        let deleted = self.inventory.delete(id, prompt).await?;
        if deleted && self.view == View::InventoryItemDetail(id) {
            self.view = View::Inventory;
        }
        Ok(deleted)
    }

    pub async fn delete_shopping(&mut self, id: u64, prompt: &dyn Prompt) -> Result<bool, ActionError> {
        self.shopping.delete(id, prompt).await
    }

    pub fn dashboard(&self, today: Date) -> DashboardSummary {
        DashboardSummary::compute(
            self.profile.profile.as_ref(),
            &self.inventory.items,
            &self.shopping.items,
            today,
        )
    }

    pub fn notifications(&self, today: Date) -> Vec<ExpiryAlert> {
        expiry_alerts(&self.inventory.items, today)
    }
}
