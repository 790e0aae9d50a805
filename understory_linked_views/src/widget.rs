// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The widget: two initialized views plus the shared selection state.

use core::hash::Hash;

use kurbo::{Point, Rect, Size};
use tracing::{debug, trace};
use understory_selection::{Merged, SelectionState};

use crate::brush::BrushGesture;
use crate::config::{ConfigError, HoverEdit, LinkedViewsConfig};
use crate::data::Dataset;
use crate::entity::{EntityId, View};
use crate::highlight::apply_highlight;
use crate::style::BaseStyle;
use crate::surface::{Interaction, Modifiers, RenderSurface};
use crate::view::{ViewContext, ViewElements, init_view};

/// Errors raised by [`LinkedViews::render`].
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The surface size is not positive and finite.
    #[error("surface size {width}x{height} must be positive and finite")]
    InvalidSize {
        /// Requested width.
        width: f64,
        /// Requested height.
        height: f64,
    },

    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Clone, Debug)]
struct ViewSlot<E> {
    context: ViewContext,
    elements: ViewElements<E>,
    gesture: BrushGesture,
}

/// A rendered pair of linked views.
///
/// Each instance owns its selection state, so several widgets can live in
/// one process without sharing anything. Event handlers take `&mut self`:
/// hosts deliver events one at a time from a single thread, and each handler
/// runs to completion before the next starts.
#[derive(Clone, Debug)]
pub struct LinkedViews<E> {
    config: LinkedViewsConfig,
    size: Size,
    map: ViewSlot<E>,
    scatter: ViewSlot<E>,
    selection: SelectionState<View, EntityId>,
    active_brush: Option<View>,
}

impl<E> LinkedViews<E>
where
    E: Copy + Eq + Hash,
{
    /// Draws both views onto `surface` and returns the live widget.
    ///
    /// Elements get their geometry and base encoding here. Emphasis is first
    /// written by the first interaction.
    pub fn render<S>(
        surface: &mut S,
        width: f64,
        height: f64,
        dataset: &Dataset,
        config: LinkedViewsConfig,
    ) -> Result<Self, RenderError>
    where
        S: RenderSurface<Element = E>,
    {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RenderError::InvalidSize { width, height });
        }
        config.validate()?;

        let mut style = BaseStyle::from_config(&config.palette)?;
        let map_ctx = ViewContext::map(width, height, dataset);
        let scatter_ctx = ViewContext::scatter(width, height, dataset, &config.scatter);
        let map_elements = init_view(surface, &map_ctx, dataset, &mut style, &config)?;
        let scatter_elements = init_view(surface, &scatter_ctx, dataset, &mut style, &config)?;

        debug!(
            width,
            height,
            features = map_elements.len(),
            points = scatter_elements.len(),
            "linked views rendered"
        );

        Ok(Self {
            size: Size::new(width, height),
            map: ViewSlot {
                gesture: BrushGesture::new(map_ctx.brush_region),
                context: map_ctx,
                elements: map_elements,
            },
            scatter: ViewSlot {
                gesture: BrushGesture::new(scatter_ctx.brush_region),
                context: scatter_ctx,
                elements: scatter_elements,
            },
            selection: SelectionState::with_sources(View::ALL),
            active_brush: None,
            config,
        })
    }

    /// Layout is fixed at render time; this only logs the request.
    pub fn resize(&mut self, width: f64, height: f64) {
        debug!(
            width,
            height,
            rendered_width = self.size.width,
            rendered_height = self.size.height,
            "resize ignored; layout is fixed at render time"
        );
    }

    /// Applies a brush rectangle (surface pixels) reported for `view`.
    ///
    /// `None` leaves everything as is. A rectangle replaces the view's source
    /// with the entities inside it; a zero-area one empties the source.
    pub fn handle_brush<S>(&mut self, surface: &mut S, view: View, selection: Option<Rect>)
    where
        S: RenderSurface<Element = E>,
    {
        let Some(rect) = selection else {
            trace!(%view, "brush event without a selection; ignored");
            return;
        };
        let ids = self.slot(view).context.brush_selection(rect);
        trace!(%view, selected = ids.len(), "brush applied");
        self.selection.replace(view, ids);
        self.refresh(surface, &self.selection.merged());
    }

    /// Empties `view`'s source after its brush was removed.
    pub fn clear_brush<S>(&mut self, surface: &mut S, view: View)
    where
        S: RenderSurface<Element = E>,
    {
        trace!(%view, "brush cleared");
        self.selection.clear(view);
        self.refresh(surface, &self.selection.merged());
    }

    /// Hover over `element` with `modifiers` held.
    ///
    /// The add/remove bindings edit the source of the view owning the element;
    /// either way the hovered entity is previewed on top of the merged
    /// selection without being stored. Elements this widget did not create are
    /// ignored.
    pub fn handle_pointer_enter<S>(&mut self, surface: &mut S, element: E, modifiers: Modifiers)
    where
        S: RenderSurface<Element = E>,
    {
        let Some((view, id)) = self.resolve(element) else {
            trace!("pointer entered an unknown element; ignored");
            return;
        };
        match self.config.hover.edit(modifiers) {
            HoverEdit::Add => {
                self.selection.add(view, id);
            }
            HoverEdit::Remove => {
                self.selection.remove(view, &id);
            }
            HoverEdit::Preview => {}
        }
        trace!(%view, %id, ?modifiers, "hover");
        self.refresh(surface, &self.selection.merged_with(&id));
    }

    /// Pointer left the hovered element: drop the preview.
    pub fn handle_pointer_leave<S>(&mut self, surface: &mut S)
    where
        S: RenderSurface<Element = E>,
    {
        self.refresh(surface, &self.selection.merged());
    }

    /// Starts a brush gesture if `position` is inside a view's brush region.
    ///
    /// Returns `true` if a gesture started.
    pub fn handle_pointer_down(&mut self, position: Point) -> bool {
        if let Some(previous) = self.active_brush.take() {
            self.slot_mut(previous).gesture.cancel();
        }
        for view in View::ALL {
            if self.slot_mut(view).gesture.begin(position) {
                trace!(%view, x = position.x, y = position.y, "brush started");
                self.active_brush = Some(view);
                return true;
            }
        }
        false
    }

    /// Extends the active brush gesture, if any, and applies it live.
    pub fn handle_pointer_move<S>(&mut self, surface: &mut S, position: Point)
    where
        S: RenderSurface<Element = E>,
    {
        let Some(view) = self.active_brush else {
            return;
        };
        let rect = self.slot_mut(view).gesture.update(position);
        self.handle_brush(surface, view, rect);
    }

    /// Finishes the active brush gesture, if any.
    ///
    /// A press and release in place empties the view's source.
    pub fn handle_pointer_up<S>(&mut self, surface: &mut S, position: Point)
    where
        S: RenderSurface<Element = E>,
    {
        let Some(view) = self.active_brush.take() else {
            return;
        };
        let rect = self.slot_mut(view).gesture.end(position);
        self.handle_brush(surface, view, rect);
    }

    /// Dispatches an [`Interaction`] to the matching handler.
    pub fn handle<S>(&mut self, surface: &mut S, interaction: Interaction<E>)
    where
        S: RenderSurface<Element = E>,
    {
        match interaction {
            Interaction::Brush { view, selection } => self.handle_brush(surface, view, selection),
            Interaction::BrushCleared { view } => self.clear_brush(surface, view),
            Interaction::PointerDown { position } => {
                self.handle_pointer_down(position);
            }
            Interaction::PointerMove { position } => self.handle_pointer_move(surface, position),
            Interaction::PointerUp { position } => self.handle_pointer_up(surface, position),
            Interaction::PointerEnter { element, modifiers } => {
                self.handle_pointer_enter(surface, element, modifiers);
            }
            Interaction::PointerLeave => self.handle_pointer_leave(surface),
        }
    }

    /// Stored selection of both views.
    #[must_use]
    pub fn selection(&self) -> &SelectionState<View, EntityId> {
        &self.selection
    }

    /// Union of both views' stored selections.
    #[must_use]
    pub fn merged(&self) -> Merged<EntityId> {
        self.selection.merged()
    }

    /// Layout and brush data of `view`.
    #[must_use]
    pub fn context(&self, view: View) -> &ViewContext {
        &self.slot(view).context
    }

    /// Entity ↔ element bindings of `view`.
    #[must_use]
    pub fn elements(&self, view: View) -> &ViewElements<E> {
        &self.slot(view).elements
    }

    /// In-progress brush gesture state of `view`.
    #[must_use]
    pub fn gesture(&self, view: View) -> &BrushGesture {
        &self.slot(view).gesture
    }

    /// Configuration the widget was rendered with.
    #[must_use]
    pub fn config(&self) -> &LinkedViewsConfig {
        &self.config
    }

    /// Surface size the widget was rendered at.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    fn slot(&self, view: View) -> &ViewSlot<E> {
        match view {
            View::Map => &self.map,
            View::Scatter => &self.scatter,
        }
    }

    fn slot_mut(&mut self, view: View) -> &mut ViewSlot<E> {
        match view {
            View::Map => &mut self.map,
            View::Scatter => &mut self.scatter,
        }
    }

    fn resolve(&self, element: E) -> Option<(View, EntityId)> {
        View::ALL.into_iter().find_map(|view| {
            self.slot(view)
                .elements
                .entity_of(element)
                .map(|id| (view, id))
        })
    }

    fn refresh<S>(&self, surface: &mut S, merged: &Merged<EntityId>)
    where
        S: RenderSurface<Element = E>,
    {
        apply_highlight(
            surface,
            &[&self.map.elements, &self.scatter.elements],
            merged,
            &self.config.emphasis,
        );
    }
}
