//! Placement state machine for the classification task.
//!
//! A [`Board`] tracks where every catalog card sits (the shared pool
//! or one of the drop zones) plus a single armed-card cursor shared by
//! both input styles: click-to-arm-then-click-a-zone and drag-drop.
//! Every card occupies exactly one slot at all times; placing a card
//! that already sits in a zone moves it.

use std::collections::HashMap;

use crate::error::LabError;
use crate::model::{CatalogItem, ClassificationSpec, Zone, ZoneMark};

/// Where a card currently sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Pool,
    Zone(String),
}

/// What a placement action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementEvent {
    /// The card became the armed cursor.
    Armed { item: String },
    /// Clicking the armed card cleared the cursor.
    Disarmed { item: String },
    /// The cursor moved from one card to another.
    Switched { from: String, to: String },
    /// A card landed in a zone.
    Placed { item: String, zone: String },
    /// Nothing changed.
    Ignored,
}

/// Card positions, the armed-card cursor and per-zone check marks.
#[derive(Debug, Clone)]
pub struct Board {
    items: Vec<CatalogItem>,
    zones: Vec<Zone>,
    slots: HashMap<String, Slot>,
    cursor: Option<String>,
    marks: HashMap<String, ZoneMark>,
}

impl Board {
    pub fn new(spec: &ClassificationSpec) -> Self {
        let slots = spec
            .items
            .iter()
            .map(|item| (item.id.clone(), Slot::Pool))
            .collect();
        Self {
            items: spec.items.clone(),
            zones: spec.zones.clone(),
            slots,
            cursor: None,
            marks: HashMap::new(),
        }
    }

    /// Click on a card: arm it, disarm it, or switch the cursor to it.
    pub fn click_item(&mut self, item: &str) -> Result<PlacementEvent, LabError> {
        self.require_item(item)?;
        match self.cursor.take() {
            Some(prev) if prev == item => {
                tracing::debug!(item, "card disarmed");
                Ok(PlacementEvent::Disarmed { item: prev })
            }
            Some(prev) => {
                self.cursor = Some(item.to_owned());
                Ok(PlacementEvent::Switched {
                    from: prev,
                    to: item.to_owned(),
                })
            }
            None => {
                self.cursor = Some(item.to_owned());
                Ok(PlacementEvent::Armed {
                    item: item.to_owned(),
                })
            }
        }
    }

    /// Click on a zone: place the armed card there, clearing the
    /// cursor; with nothing armed the click is ignored.
    pub fn click_zone(&mut self, zone: &str) -> Result<PlacementEvent, LabError> {
        self.require_zone(zone)?;
        match self.cursor.take() {
            Some(item) => {
                self.slots.insert(item.clone(), Slot::Zone(zone.to_owned()));
                tracing::debug!(%item, zone, "card placed by click");
                Ok(PlacementEvent::Placed {
                    item,
                    zone: zone.to_owned(),
                })
            }
            None => {
                tracing::debug!(zone, "zone click with nothing armed");
                Ok(PlacementEvent::Ignored)
            }
        }
    }

    /// One-step placement: puts the card in the zone and clears the
    /// cursor, whatever it pointed at.
    pub fn place(&mut self, item: &str, zone: &str) -> Result<PlacementEvent, LabError> {
        self.require_item(item)?;
        self.require_zone(zone)?;
        self.cursor = None;
        self.slots.insert(item.to_owned(), Slot::Zone(zone.to_owned()));
        Ok(PlacementEvent::Placed {
            item: item.to_owned(),
            zone: zone.to_owned(),
        })
    }

    /// Start of a drag: the dragged card becomes the cursor.
    pub fn drag_start(&mut self, item: &str) -> Result<PlacementEvent, LabError> {
        self.require_item(item)?;
        self.cursor = Some(item.to_owned());
        Ok(PlacementEvent::Armed {
            item: item.to_owned(),
        })
    }

    /// Drop onto a zone. The armed cursor wins over the transfer
    /// payload; a drop resolving to no card is ignored. The cursor is
    /// deliberately left armed after a successful drop.
    pub fn drop_on_zone(
        &mut self,
        zone: &str,
        payload: Option<&str>,
    ) -> Result<PlacementEvent, LabError> {
        self.require_zone(zone)?;
        let resolved = self
            .cursor
            .clone()
            .or_else(|| payload.filter(|p| self.slots.contains_key(*p)).map(str::to_owned));
        match resolved {
            Some(item) => {
                self.slots.insert(item.clone(), Slot::Zone(zone.to_owned()));
                tracing::debug!(%item, zone, "card placed by drop");
                Ok(PlacementEvent::Placed {
                    item,
                    zone: zone.to_owned(),
                })
            }
            None => {
                tracing::debug!(zone, "drop resolved to no card");
                Ok(PlacementEvent::Ignored)
            }
        }
    }

    /// Drop outside any zone: cards never vanish, so nothing happens.
    pub fn drop_outside(&mut self) -> PlacementEvent {
        tracing::debug!("drop outside any zone");
        PlacementEvent::Ignored
    }

    /// Returns every card to the pool and clears cursor and marks.
    pub fn reset(&mut self) {
        for slot in self.slots.values_mut() {
            *slot = Slot::Pool;
        }
        self.cursor = None;
        self.marks.clear();
    }

    /// Replaces the per-zone check marks.
    pub fn set_marks(&mut self, marks: impl IntoIterator<Item = (String, ZoneMark)>) {
        self.marks = marks.into_iter().collect();
    }

    pub fn armed(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn slot(&self, item: &str) -> Option<&Slot> {
        self.slots.get(item)
    }

    pub fn mark(&self, zone: &str) -> Option<ZoneMark> {
        self.marks.get(zone).copied()
    }

    /// Cards still in the pool, in catalog order.
    pub fn pool_items(&self) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| self.slots.get(&item.id) == Some(&Slot::Pool))
            .collect()
    }

    /// Cards sitting in the given zone, in catalog order.
    pub fn items_in(&self, zone: &str) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| {
                matches!(self.slots.get(&item.id), Some(Slot::Zone(z)) if z == zone)
            })
            .collect()
    }

    /// Number of cards placed in any zone.
    pub fn placed_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, Slot::Zone(_)))
            .count()
    }

    fn require_item(&self, item: &str) -> Result<(), LabError> {
        if self.slots.contains_key(item) {
            Ok(())
        } else {
            Err(LabError::UnknownItem(item.to_owned()))
        }
    }

    fn require_zone(&self, zone: &str) -> Result<(), LabError> {
        if self.zone(zone).is_some() {
            Ok(())
        } else {
            Err(LabError::UnknownZone(zone.to_owned()))
        }
    }
}
