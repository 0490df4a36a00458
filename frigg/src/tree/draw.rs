//! Drawing and the height contract.

use indextree::NodeId;

use crate::{
    Area, Edit, ListOp, NodeKind, PropertyId, PropertyKind, PropertyTree, PropertyView, Rect,
    TreeError, Ui,
};
use crate::{debug, trace};

use super::Phase;

impl PropertyTree {
    /// Draw every property with automatic layout.
    ///
    /// Refreshes the store, draws the root's children in order (layout
    /// members are drawn afterwards, grouped), applies the user's edits and
    /// commits them.
    pub fn draw(&mut self, ui: &mut dyn Ui) -> Result<(), TreeError> {
        self.draw_area(ui, Area::Auto)
    }

    /// Like [`PropertyTree::draw`], inside an explicit rectangle.
    pub fn draw_in(&mut self, ui: &mut dyn Ui, rect: Rect) -> Result<(), TreeError> {
        self.draw_area(ui, Area::Rect(rect))
    }

    fn draw_area(&mut self, ui: &mut dyn Ui, area: Area) -> Result<(), TreeError> {
        trace!("draw cycle");
        self.bracketed(Phase::Drawing, |tree| {
            tree.pull(tree.root);
            let inline: Vec<NodeId> = tree
                .root
                .children(&tree.arena)
                .filter(|&id| !tree.node(id).is_layout_member)
                .collect();

            let mut rest = area;
            for id in inline {
                rest = tree.draw_property(ui, id, rest)?;
            }

            for layout in tree.layouts.clone() {
                ui.begin_layout(layout.name());
                for member in layout.members() {
                    if member.0.is_removed(&tree.arena) {
                        continue;
                    }
                    rest = tree.draw_property(ui, member.0, rest)?;
                }
                ui.end_layout(layout.name());
            }
            Ok(())
        })
    }

    /// Pull a property, then draw its decorators and body at the top of
    /// `area`. Returns the area left below it. Properties whose member does
    /// not resolve are skipped.
    fn draw_property(
        &mut self,
        ui: &mut dyn Ui,
        id: NodeId,
        area: Area,
    ) -> Result<Area, TreeError> {
        self.pull(id);
        if self.node(id).list().is_some() {
            self.sync_elements(id);
        }
        if !self.node(id).value.is_resolved() {
            trace!("skipping unresolved `{}`", self.node(id).meta.path());
            return Ok(area);
        }

        let (slot, rest) = area.split_top(self.height_of(id));
        let view = self.view(id);
        let metrics = self.options.metrics;
        let decorators = core::mem::take(&mut self.node_mut(id).decorators);
        let result = decorators.draw(ui, &view, slot, &metrics, |ui, body| {
            self.draw_body(ui, id, &view, body)
        });
        if !id.is_removed(&self.arena) {
            self.node_mut(id).decorators = decorators;
        }
        result.map(|()| rest)
    }

    fn draw_body(
        &mut self,
        ui: &mut dyn Ui,
        id: NodeId,
        view: &PropertyView,
        area: Area,
    ) -> Result<(), TreeError> {
        let line_height = self.options.metrics.line_height;
        match view.kind() {
            NodeKind::Leaf => {
                if let Edit::Changed(value) = ui.property_field(view, area) {
                    if view.is_read_only() {
                        debug!("ignoring edit of read-only `{}`", view.meta().path());
                    } else {
                        self.set_value(PropertyId(id), value)?;
                    }
                }
                Ok(())
            }
            NodeKind::Composite => {
                let (header, mut rest) = area.split_top(line_height);
                let expanded = ui.foldout(view, header);
                self.node_mut(id).is_expanded = expanded;
                if expanded {
                    let children: Vec<NodeId> = id.children(&self.arena).collect();
                    for child in children {
                        rest = self.draw_property(ui, child, rest)?;
                    }
                }
                Ok(())
            }
            NodeKind::Array => self.draw_list(ui, id, view, area),
        }
    }

    fn draw_list(
        &mut self,
        ui: &mut dyn Ui,
        id: NodeId,
        view: &PropertyView,
        area: Area,
    ) -> Result<(), TreeError> {
        let metrics = self.options.metrics;
        let Some(list) = self.node(id).list() else {
            return Ok(());
        };
        let settings = *list.settings();

        let mut rest = area;
        if !settings.hide_header {
            let (header, below) = rest.split_top(metrics.line_height);
            ui.list_header(view, &list.header_label(&view.label()), header);
            rest = below;
        }

        let children: Vec<NodeId> = id.children(&self.arena).collect();
        for child in children {
            rest = self.draw_property(ui, child, rest)?;
            rest = rest.split_top(metrics.spacing).1;
        }

        let Some(list) = self.node(id).list() else {
            return Ok(());
        };
        let controls = list.controls();
        let (controls_area, _) = rest.split_top(metrics.line_height);
        let gesture = ui.list_controls(view, &controls, controls_area);

        match list.resolve(gesture) {
            None => {}
            Some(ListOp::Select(index)) => {
                if let Some(list) = self.node_mut(id).list_mut() {
                    list.set_active(Some(index));
                }
            }
            Some(ListOp::Add) => {
                self.add_element(PropertyId(id))?;
            }
            Some(ListOp::Remove(index)) => self.remove_element(PropertyId(id), index)?,
            Some(ListOp::Move { from, to }) => self.move_element(PropertyId(id), from, to)?,
        }
        Ok(())
    }

    /// Height of a property: its visible decorators plus its body.
    pub fn property_height(&self, id: PropertyId) -> Result<f32, TreeError> {
        self.check(id)?;
        Ok(self.height_of(id.0))
    }

    /// Height of the whole tree as of the last pull.
    pub fn height(&self) -> f32 {
        self.root
            .children(&self.arena)
            .map(|id| self.height_of(id))
            .sum()
    }

    /// Height of a list element: the element's property height plus
    /// spacing.
    pub fn element_height(&self, id: PropertyId) -> Result<f32, TreeError> {
        Ok(self.property_height(id)? + self.options.metrics.spacing)
    }

    fn height_of(&self, id: NodeId) -> f32 {
        let node = self.node(id);
        if !node.value.is_resolved() {
            return 0.0;
        }
        let metrics = &self.options.metrics;
        let decorators = node.decorators.height(&self.view(id), metrics);
        let body = match &node.kind {
            PropertyKind::Leaf => metrics.line_height,
            PropertyKind::Composite => {
                let children: f32 = if node.is_expanded {
                    id.children(&self.arena).map(|c| self.height_of(c)).sum()
                } else {
                    0.0
                };
                metrics.line_height + children
            }
            PropertyKind::Array(list) => {
                let elements: f32 = id
                    .children(&self.arena)
                    .map(|c| self.height_of(c) + metrics.spacing)
                    .sum();
                list.chrome_height(metrics) + elements
            }
        };
        decorators + body
    }
}
