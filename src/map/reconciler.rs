use indexmap::IndexMap;

use crate::models::TrainPosition;

/// Map layer capable of hosting train markers and their labels
///
/// Handles are owned by the caller; a handle passed to [`MarkerSurface::remove`]
/// must not be used again.
pub trait MarkerSurface {
    type Handle;
    type Error: std::fmt::Debug;

    fn add_marker(&mut self, train: &TrainPosition) -> Result<Self::Handle, Self::Error>;
    fn add_label(&mut self, train: &TrainPosition) -> Result<Self::Handle, Self::Error>;
    fn update_marker(&mut self, handle: &Self::Handle, train: &TrainPosition) -> Result<(), Self::Error>;
    fn update_label(&mut self, handle: &Self::Handle, train: &TrainPosition) -> Result<(), Self::Error>;
    fn remove(&mut self, handle: Self::Handle);
}

/// One step needed to bring the map in line with a new position set
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerChange<'a> {
    Create(&'a TrainPosition),
    Update(&'a TrainPosition),
    Remove(String),
}

/// Diff the currently shown trains against the next set, keyed by train id
///
/// Duplicate ids in `next` collapse to their last occurrence. Removals come
/// first, then creates and updates in `next` order. Unchanged trains yield
/// nothing.
#[must_use]
pub fn plan_changes<'a>(
    current: &IndexMap<String, TrainPosition>,
    next: &'a [TrainPosition],
) -> Vec<MarkerChange<'a>> {
    let mut keyed: IndexMap<&str, &TrainPosition> = IndexMap::with_capacity(next.len());
    for train in next {
        keyed.insert(train.id.as_str(), train);
    }

    let mut changes: Vec<MarkerChange<'a>> = current
        .keys()
        .filter(|id| !keyed.contains_key(id.as_str()))
        .map(|id| MarkerChange::Remove(id.clone()))
        .collect();

    for (id, train) in keyed {
        match current.get(id) {
            None => changes.push(MarkerChange::Create(train)),
            Some(shown) if shown != train => changes.push(MarkerChange::Update(train)),
            Some(_) => {}
        }
    }

    changes
}

/// Counts of what one reconciliation pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    /// Surface errors, as `(train id, message)`
    pub failures: Vec<(String, String)>,
}

struct TrainMarkers<H> {
    marker: H,
    label: H,
}

/// Keeps exactly one marker and one label per shown train
///
/// Owns every handle it creates and releases them on removal, on
/// [`MarkerReconciler::clear`], and on drop.
pub struct MarkerReconciler<S: MarkerSurface> {
    surface: S,
    shown: IndexMap<String, TrainPosition>,
    markers: IndexMap<String, TrainMarkers<S::Handle>>,
}

impl<S: MarkerSurface> MarkerReconciler<S> {
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            shown: IndexMap::new(),
            markers: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    pub fn is_shown(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    pub fn reconcile(&mut self, next: &[TrainPosition]) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for change in plan_changes(&self.shown, next) {
            match change {
                MarkerChange::Remove(id) => {
                    self.remove_train(&id);
                    summary.removed += 1;
                }
                MarkerChange::Create(train) => match self.create_train(train) {
                    Ok(()) => summary.created += 1,
                    Err(e) => summary.failures.push((train.id.clone(), format!("{e:?}"))),
                },
                MarkerChange::Update(train) => match self.update_train(train) {
                    Ok(()) => summary.updated += 1,
                    Err(e) => {
                        // A half-updated pair is replaced outright
                        self.remove_train(&train.id);
                        summary.failures.push((train.id.clone(), format!("{e:?}")));
                        if self.create_train(train).is_ok() {
                            summary.created += 1;
                        }
                    }
                },
            }
        }

        summary
    }

    /// Remove every marker and label
    pub fn clear(&mut self) {
        let ids: Vec<String> = self.markers.keys().cloned().collect();
        for id in ids {
            self.remove_train(&id);
        }
        self.shown.clear();
    }

    fn create_train(&mut self, train: &TrainPosition) -> Result<(), S::Error> {
        let marker = self.surface.add_marker(train)?;
        let label = match self.surface.add_label(train) {
            Ok(label) => label,
            Err(e) => {
                self.surface.remove(marker);
                return Err(e);
            }
        };

        self.markers.insert(train.id.clone(), TrainMarkers { marker, label });
        self.shown.insert(train.id.clone(), train.clone());
        Ok(())
    }

    fn update_train(&mut self, train: &TrainPosition) -> Result<(), S::Error> {
        let Some(pair) = self.markers.get(&train.id) else {
            return self.create_train(train);
        };

        self.surface.update_marker(&pair.marker, train)?;
        self.surface.update_label(&pair.label, train)?;
        self.shown.insert(train.id.clone(), train.clone());
        Ok(())
    }

    fn remove_train(&mut self, id: &str) {
        if let Some(pair) = self.markers.shift_remove(id) {
            self.surface.remove(pair.marker);
            self.surface.remove(pair.label);
        }
        self.shown.shift_remove(id);
    }
}

impl<S: MarkerSurface> Drop for MarkerReconciler<S> {
    fn drop(&mut self) {
        self.clear();
    }
}
