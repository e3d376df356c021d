//! Direct-stiffness finite element model of a single member.
//!
//! A [`BeamModel`] discretises a [`Member`] into collinear Euler–Bernoulli
//! elements with three degrees of freedom per node, assembles the reduced
//! stiffness matrix over the free degrees of freedom and solves for nodal
//! displacements, element end forces and support reactions.

use nalgebra::{DMatrix, DVector, SMatrix, SVector};
use serde::Serialize;
use tracing::debug;

use crate::errors::{AnalysisError, MemberError, ModelError};
use crate::geometry::{Action, Displacement, Restraint};
use crate::loads::{DistLoad, LoadMode, PointLoad};
use crate::member::Member;

/// Maximum node spacing in inches used when none is specified.
pub const DEFAULT_MAX_NODE_SPACING: f64 = 6.0;

/// Smallest pivot, relative to the largest, accepted by the solve.
const PIVOT_TOLERANCE: f64 = 1.0e-12;

/// Local stiffness matrix of one element, ordered `[u_i, v_i, θ_i, u_j, v_j, θ_j]`.
pub type ElementStiffness = SMatrix<f64, 6, 6>;

/// End forces of one element in the same order as [`ElementStiffness`].
pub type ElementForces = SVector<f64, 6>;

/// Lifecycle of a [`BeamModel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum AnalysisState {
    /// Nothing has been discretised or assembled yet.
    #[default]
    Uninitialized,
    /// Discretised and assembled but not solved.
    Ready,
    /// Solved; results may be read.
    Complete,
}

/// Solved quantities, present only while the model is [`AnalysisState::Complete`].
#[derive(Clone, Debug)]
struct Solution {
    displacements: DVector<f64>,
    element_forces: Vec<ElementForces>,
    support_reactions: Vec<Action>,
}

/// Finite element model of one [`Member`].
#[derive(Clone, Debug)]
pub struct BeamModel {
    member: Member,
    max_node_spacing: f64,
    state: AnalysisState,
    points_of_interest: Vec<f64>,
    nodes: Vec<f64>,
    elements: Vec<[usize; 2]>,
    support_nodes: Vec<usize>,
    node_restraints: Vec<Restraint>,
    node_point_loads: Vec<Action>,
    element_dist_loads: Vec<[(f64, f64); 3]>,
    element_fixed_end_forces: Vec<ElementForces>,
    dof_numbers: Vec<[usize; 3]>,
    dof_count: usize,
    local_stiffness: Vec<ElementStiffness>,
    global_stiffness: DMatrix<f64>,
    nodal_loads: DVector<f64>,
    fixed_end_loads: DVector<f64>,
    solution: Option<Solution>,
}

impl BeamModel {
    /// Create a model of `member`.
    ///
    /// When `initialize` is `true` the member is discretised and assembled
    /// immediately and the model starts in [`AnalysisState::Ready`]; otherwise it
    /// stays [`AnalysisState::Uninitialized`] until [`BeamModel::initialize`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidNodeSpacing`] when `max_node_spacing` is not a
    /// positive finite number.
    ///
    /// # Examples
    /// ```
    /// use pondx::{simple_supports, BeamModel, Member, SteelBeamSize};
    ///
    /// let section = SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0);
    /// let member = Member::new(240.0, &section, simple_supports(240.0)).expect("valid member");
    /// let model = BeamModel::new(member, 6.0, true).expect("valid spacing");
    /// assert_eq!(model.nodes().len(), 41);
    /// assert_eq!(model.dof_count(), 119);
    /// ```
    pub fn new(member: Member, max_node_spacing: f64, initialize: bool) -> Result<Self, ModelError> {
        if !(max_node_spacing.is_finite() && max_node_spacing > 0.0) {
            return Err(ModelError::InvalidNodeSpacing(max_node_spacing));
        }
        let mut model = Self {
            member,
            max_node_spacing,
            state: AnalysisState::Uninitialized,
            points_of_interest: Vec::new(),
            nodes: Vec::new(),
            elements: Vec::new(),
            support_nodes: Vec::new(),
            node_restraints: Vec::new(),
            node_point_loads: Vec::new(),
            element_dist_loads: Vec::new(),
            element_fixed_end_forces: Vec::new(),
            dof_numbers: Vec::new(),
            dof_count: 0,
            local_stiffness: Vec::new(),
            global_stiffness: DMatrix::zeros(0, 0),
            nodal_loads: DVector::zeros(0),
            fixed_end_loads: DVector::zeros(0),
            solution: None,
        };
        if initialize {
            model.initialize();
        }
        Ok(model)
    }

    /// Discretise and assemble the model, discarding any previous solution.
    pub fn initialize(&mut self) {
        self.solution = None;
        self.collect_points_of_interest();
        self.create_nodes_and_elements();
        self.map_supports_and_point_loads();
        self.map_distributed_loads();
        self.number_degrees_of_freedom();
        self.assemble_stiffness();
        self.assemble_load_vectors();
        self.state = AnalysisState::Ready;
    }

    /// Drop the current solution, keeping the assembled system.
    pub fn invalidate(&mut self) {
        if self.state == AnalysisState::Complete {
            self.solution = None;
            self.state = AnalysisState::Ready;
        }
    }

    /// Replace or extend the member's point loads and re-initialise the model.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError`] when a load lies outside the member. The model is
    /// left untouched in that case.
    pub fn add_point_loads(
        &mut self,
        loads: Vec<PointLoad>,
        mode: LoadMode,
    ) -> Result<(), MemberError> {
        self.member.set_point_loads(loads, mode)?;
        self.initialize();
        Ok(())
    }

    /// Replace or extend the member's distributed loads and re-initialise the model.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError`] when a load lies outside the member. The model is
    /// left untouched in that case.
    pub fn add_dist_loads(&mut self, loads: Vec<DistLoad>, mode: LoadMode) -> Result<(), MemberError> {
        self.member.set_dist_loads(loads, mode)?;
        self.initialize();
        Ok(())
    }

    /// Solve the assembled system.
    ///
    /// Does nothing when the model is already solved.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotInitialized`] before [`BeamModel::initialize`]
    /// and [`AnalysisError::SingularStiffness`] when the supports do not prevent
    /// rigid body motion.
    pub fn analyze(&mut self) -> Result<(), AnalysisError> {
        match self.state {
            AnalysisState::Complete => return Ok(()),
            AnalysisState::Uninitialized => return Err(AnalysisError::NotInitialized),
            AnalysisState::Ready => {}
        }

        let load = &self.nodal_loads - &self.fixed_end_loads;
        let displacements = if self.dof_count == 0 {
            DVector::zeros(0)
        } else {
            let lu = self.global_stiffness.clone().lu();
            // Round-off pivots stand in for zero ones when a mechanism remains.
            let pivots = lu.u().diagonal();
            if pivots.amin() <= PIVOT_TOLERANCE * pivots.amax() {
                return Err(AnalysisError::SingularStiffness);
            }
            lu.solve(&load).ok_or(AnalysisError::SingularStiffness)?
        };
        if displacements.iter().any(|value| !value.is_finite()) {
            return Err(AnalysisError::SingularStiffness);
        }

        let element_forces = self.recover_element_forces(&displacements);
        let support_reactions = self.recover_support_reactions(&element_forces);
        debug!(
            section = self.member.section_name(),
            length = self.member.length(),
            nodes = self.nodes.len(),
            dofs = self.dof_count,
            max_displacement = displacements.iter().fold(0.0_f64, |max, value| max.max(value.abs())),
            "solved beam model"
        );
        self.solution = Some(Solution {
            displacements,
            element_forces,
            support_reactions,
        });
        self.state = AnalysisState::Complete;
        Ok(())
    }

    /// The modelled member.
    #[must_use]
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Maximum distance between adjacent nodes in inches.
    #[must_use]
    pub fn max_node_spacing(&self) -> f64 {
        self.max_node_spacing
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AnalysisState {
        self.state
    }

    /// Whether the model has been discretised and assembled.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state != AnalysisState::Uninitialized
    }

    /// Whether results are available.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == AnalysisState::Complete
    }

    /// Sorted locations that must coincide with nodes.
    #[must_use]
    pub fn points_of_interest(&self) -> &[f64] {
        &self.points_of_interest
    }

    /// Node locations in inches from the start of the member.
    #[must_use]
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Node index pairs of each element.
    #[must_use]
    pub fn elements(&self) -> &[[usize; 2]] {
        &self.elements
    }

    /// Indices of the nodes carrying a support, in support location order.
    #[must_use]
    pub fn support_nodes(&self) -> &[usize] {
        &self.support_nodes
    }

    /// Combined restraint at each node.
    #[must_use]
    pub fn node_restraints(&self) -> &[Restraint] {
        &self.node_restraints
    }

    /// Global equation number of each nodal degree of freedom.
    ///
    /// `0` marks a restrained degree of freedom; free ones are numbered from 1.
    #[must_use]
    pub fn dof_numbers(&self) -> &[[usize; 3]] {
        &self.dof_numbers
    }

    /// Number of free degrees of freedom.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.dof_count
    }

    /// Local stiffness matrix of each element.
    #[must_use]
    pub fn local_stiffness(&self) -> &[ElementStiffness] {
        &self.local_stiffness
    }

    /// Reduced global stiffness matrix over the free degrees of freedom.
    #[must_use]
    pub fn global_stiffness(&self) -> &DMatrix<f64> {
        &self.global_stiffness
    }

    /// Directly applied nodal loads at the free degrees of freedom.
    #[must_use]
    pub fn nodal_load_vector(&self) -> &DVector<f64> {
        &self.nodal_loads
    }

    /// Summed fixed-end forces of the distributed loads at the free degrees of freedom.
    #[must_use]
    pub fn fixed_end_load_vector(&self) -> &DVector<f64> {
        &self.fixed_end_loads
    }

    /// Summed distributed load intensities `(at i, at j)` on each element.
    #[must_use]
    pub fn element_dist_loads(&self) -> &[[(f64, f64); 3]] {
        &self.element_dist_loads
    }

    /// Fixed-end forces of each element.
    #[must_use]
    pub fn element_fixed_end_forces(&self) -> &[ElementForces] {
        &self.element_fixed_end_forces
    }

    fn solution(&self) -> Result<&Solution, AnalysisError> {
        self.solution.as_ref().ok_or(AnalysisError::NotSolved)
    }

    /// Solved displacements of the free degrees of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn displacements(&self) -> Result<&DVector<f64>, AnalysisError> {
        Ok(&self.solution()?.displacements)
    }

    /// Displacement of every node, zero at restrained degrees of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn node_displacements(&self) -> Result<Vec<Displacement>, AnalysisError> {
        let displacements = &self.solution()?.displacements;
        Ok(self
            .dof_numbers
            .iter()
            .map(|dofs| Displacement::from(gather(displacements, dofs)))
            .collect())
    }

    /// End forces of each element, `K·d + fixed-end forces`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn element_forces(&self) -> Result<&[ElementForces], AnalysisError> {
        Ok(&self.solution()?.element_forces)
    }

    /// Reaction at every node, zero at unrestrained degrees of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn support_reactions(&self) -> Result<&[Action], AnalysisError> {
        Ok(&self.solution()?.support_reactions)
    }

    /// Reactions at the support nodes, in support location order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn reactions_at_supports(&self) -> Result<Vec<Action>, AnalysisError> {
        let reactions = &self.solution()?.support_reactions;
        Ok(self.support_nodes.iter().map(|&node| reactions[node]).collect())
    }

    /// Transverse deflection at `x`, interpolated linearly between nodes.
    ///
    /// Locations beyond the member ends take the end deflection.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn deflection_at(&self, x: f64) -> Result<f64, AnalysisError> {
        let shape = self.deflected_shape()?;
        Ok(interpolate(&shape, x))
    }

    /// Transverse deflection at every node as `(x, v)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn deflected_shape(&self) -> Result<Vec<(f64, f64)>, AnalysisError> {
        let displacements = self.node_displacements()?;
        Ok(self
            .nodes
            .iter()
            .zip(displacements)
            .map(|(&x, displacement)| (x, displacement.transverse))
            .collect())
    }

    /// Internal shear at both ends of every element as `(x, V)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn shear_diagram(&self) -> Result<Vec<(f64, f64)>, AnalysisError> {
        self.element_diagram(|forces| (forces[1], -forces[4]))
    }

    /// Internal bending moment at both ends of every element as `(x, M)` pairs.
    ///
    /// Sagging moments are positive.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::NotSolved`] before [`BeamModel::analyze`].
    pub fn moment_diagram(&self) -> Result<Vec<(f64, f64)>, AnalysisError> {
        self.element_diagram(|forces| (-forces[2], forces[5]))
    }

    fn element_diagram(
        &self,
        internal: impl Fn(&ElementForces) -> (f64, f64),
    ) -> Result<Vec<(f64, f64)>, AnalysisError> {
        let forces = &self.solution()?.element_forces;
        let mut diagram = Vec::with_capacity(2 * forces.len());
        for (&[i, j], element) in self.elements.iter().zip(forces) {
            let (at_i, at_j) = internal(element);
            diagram.push((self.nodes[i], at_i));
            diagram.push((self.nodes[j], at_j));
        }
        Ok(diagram)
    }

    /// Tolerance used to decide whether two locations coincide.
    fn tolerance(&self) -> f64 {
        1.0e-9 * self.member.length().max(1.0)
    }

    fn collect_points_of_interest(&mut self) {
        let length = self.member.length();
        let mut points = vec![0.0, length];
        points.extend(self.member.supports().iter().map(|support| support.location));
        points.extend(self.member.point_loads().iter().map(PointLoad::location));
        for load in self.member.dist_loads() {
            points.push(load.start());
            points.push(load.end());
        }
        for point in &mut points {
            *point = point.clamp(0.0, length);
        }
        points.sort_by(f64::total_cmp);
        let tolerance = self.tolerance();
        points.dedup_by(|later, earlier| (*later - *earlier).abs() <= tolerance);
        if let Some(last) = points.last_mut() {
            *last = length;
        }
        self.points_of_interest = points;
    }

    fn create_nodes_and_elements(&mut self) {
        let mut nodes = Vec::new();
        for pair in self.points_of_interest.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let span = end - start;
            let segments = (span / self.max_node_spacing - 1.0e-9).ceil().max(1.0) as usize;
            nodes.extend((0..segments).map(|i| start + span * i as f64 / segments as f64));
        }
        if let Some(&last) = self.points_of_interest.last() {
            nodes.push(last);
        }
        self.elements = (1..nodes.len()).map(|j| [j - 1, j]).collect();
        self.nodes = nodes;
    }

    /// Index of the node at `x`, if one lies within tolerance.
    fn node_at(&self, x: f64) -> Option<usize> {
        let tolerance = self.tolerance();
        let upper = self.nodes.partition_point(|&node| node < x);
        [upper.checked_sub(1), Some(upper)]
            .into_iter()
            .flatten()
            .filter(|&index| index < self.nodes.len())
            .find(|&index| (self.nodes[index] - x).abs() <= tolerance)
    }

    fn map_supports_and_point_loads(&mut self) {
        let mut restraints = vec![Restraint::FREE; self.nodes.len()];
        let mut support_nodes = Vec::with_capacity(self.member.supports().len());
        for support in self.member.supports() {
            if let Some(node) = self.node_at(support.location.clamp(0.0, self.member.length())) {
                restraints[node] = restraints[node].union(support.restraint);
                support_nodes.push(node);
            }
        }

        let mut point_loads = vec![Action::default(); self.nodes.len()];
        for load in self.member.point_loads() {
            if let Some(node) = self.node_at(load.location().clamp(0.0, self.member.length())) {
                let total = point_loads[node].to_vector() + load.magnitude().to_vector();
                point_loads[node] = Action::from(total);
            }
        }

        self.node_restraints = restraints;
        self.support_nodes = support_nodes;
        self.node_point_loads = point_loads;
    }

    fn map_distributed_loads(&mut self) {
        let tolerance = self.tolerance();
        let mut element_loads = vec![[(0.0, 0.0); 3]; self.elements.len()];
        let mut fixed_end_forces = Vec::with_capacity(self.elements.len());
        for (&[i, j], intensities) in self.elements.iter().zip(element_loads.iter_mut()) {
            let (x_i, x_j) = (self.nodes[i], self.nodes[j]);
            for load in self.member.dist_loads() {
                if load.length() <= 0.0 || !load.covers(x_i, x_j, tolerance) {
                    continue;
                }
                let at_i = load.intensity_at(x_i);
                let at_j = load.intensity_at(x_j);
                for (dof, pair) in intensities.iter_mut().enumerate() {
                    pair.0 += at_i[dof];
                    pair.1 += at_j[dof];
                }
            }
            fixed_end_forces.push(fixed_end_forces_of(intensities, x_j - x_i));
        }
        self.element_dist_loads = element_loads;
        self.element_fixed_end_forces = fixed_end_forces;
    }

    fn number_degrees_of_freedom(&mut self) {
        let mut count = 0;
        self.dof_numbers = self
            .node_restraints
            .iter()
            .map(|restraint| {
                restraint.to_array().map(|fixed| {
                    if fixed {
                        0
                    } else {
                        count += 1;
                        count
                    }
                })
            })
            .collect();
        self.dof_count = count;
    }

    /// Element end equation numbers, `None` for restrained degrees of freedom.
    fn element_equations(&self, [i, j]: [usize; 2]) -> [Option<usize>; 6] {
        let (a, b) = (self.dof_numbers[i], self.dof_numbers[j]);
        [a[0], a[1], a[2], b[0], b[1], b[2]].map(|number| number.checked_sub(1))
    }

    fn assemble_stiffness(&mut self) {
        let n = self.dof_count;
        let mut global = DMatrix::zeros(n, n);
        let mut local_matrices = Vec::with_capacity(self.elements.len());
        for &element in &self.elements {
            let length = self.nodes[element[1]] - self.nodes[element[0]];
            let local = element_stiffness(
                self.member.elastic_modulus(),
                self.member.area(),
                self.member.moment_of_inertia(),
                length,
            );
            let equations = self.element_equations(element);
            for (row_local, row) in equations.iter().enumerate() {
                let Some(row) = *row else { continue };
                for (col_local, col) in equations.iter().enumerate() {
                    let Some(col) = *col else { continue };
                    global[(row, col)] += local[(row_local, col_local)];
                }
            }
            local_matrices.push(local);
        }
        self.global_stiffness = global;
        self.local_stiffness = local_matrices;
    }

    fn assemble_load_vectors(&mut self) {
        let n = self.dof_count;
        let mut nodal = DVector::zeros(n);
        for (dofs, load) in self.dof_numbers.iter().zip(&self.node_point_loads) {
            for (number, value) in dofs.iter().zip(load.to_array()) {
                if *number != 0 {
                    nodal[number - 1] += value;
                }
            }
        }

        let mut fixed_end = DVector::zeros(n);
        for (&element, forces) in self.elements.iter().zip(&self.element_fixed_end_forces) {
            for (equation, value) in self.element_equations(element).iter().zip(forces.iter()) {
                if let Some(equation) = *equation {
                    fixed_end[equation] += value;
                }
            }
        }

        self.nodal_loads = nodal;
        self.fixed_end_loads = fixed_end;
    }

    fn recover_element_forces(&self, displacements: &DVector<f64>) -> Vec<ElementForces> {
        self.elements
            .iter()
            .zip(&self.local_stiffness)
            .zip(&self.element_fixed_end_forces)
            .map(|((&element, stiffness), fixed_end)| {
                let local = ElementForces::from_iterator(
                    self.element_equations(element)
                        .map(|equation| equation.map_or(0.0, |index| displacements[index])),
                );
                stiffness * local + fixed_end
            })
            .collect()
    }

    fn recover_support_reactions(&self, element_forces: &[ElementForces]) -> Vec<Action> {
        let mut reactions = vec![[0.0; 3]; self.nodes.len()];
        for (&[i, j], forces) in self.elements.iter().zip(element_forces) {
            for (end, node) in [i, j].into_iter().enumerate() {
                for dof in 0..3 {
                    if self.dof_numbers[node][dof] == 0 {
                        reactions[node][dof] += forces[3 * end + dof];
                    }
                }
            }
        }
        reactions
            .into_iter()
            .zip(&self.dof_numbers)
            .zip(&self.node_point_loads)
            .map(|((mut reaction, dofs), applied)| {
                for (dof, (value, load)) in reaction.iter_mut().zip(applied.to_array()).enumerate() {
                    if dofs[dof] == 0 {
                        *value -= load;
                    }
                }
                Action::from(reaction)
            })
            .collect()
    }
}

/// Gather the three nodal components from the reduced displacement vector.
fn gather(displacements: &DVector<f64>, dofs: &[usize; 3]) -> [f64; 3] {
    dofs.map(|number| {
        if number == 0 {
            0.0
        } else {
            displacements[number - 1]
        }
    })
}

/// Linear interpolation in a series sorted by `x`, clamped at both ends.
pub(crate) fn interpolate(series: &[(f64, f64)], x: f64) -> f64 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return 0.0;
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    let upper = series.partition_point(|&(at, _)| at < x);
    let (x_a, y_a) = series[upper - 1];
    let (x_b, y_b) = series[upper];
    if x_b - x_a <= 0.0 {
        return y_b;
    }
    y_a + (y_b - y_a) * (x - x_a) / (x_b - x_a)
}

/// Standard Euler–Bernoulli beam-column stiffness matrix in local coordinates.
#[must_use]
pub fn element_stiffness(
    elastic_modulus: f64,
    area: f64,
    moment_of_inertia: f64,
    length: f64,
) -> ElementStiffness {
    let ea = elastic_modulus * area / length;
    let ei = elastic_modulus * moment_of_inertia;
    let k1 = 12.0 * ei / length.powi(3);
    let k2 = 6.0 * ei / length.powi(2);
    let k3 = 4.0 * ei / length;
    let k4 = 2.0 * ei / length;
    ElementStiffness::from_row_slice(&[
        ea, 0.0, 0.0, -ea, 0.0, 0.0, //
        0.0, k1, k2, 0.0, -k1, k2, //
        0.0, k2, k3, 0.0, -k2, k4, //
        -ea, 0.0, 0.0, ea, 0.0, 0.0, //
        0.0, -k1, -k2, 0.0, k1, -k2, //
        0.0, k2, k4, 0.0, -k2, k3,
    ])
}

/// Fixed-end forces of an element of length `length` carrying linearly varying
/// intensities `(at i, at j)` for each degree of freedom.
///
/// The returned vector holds the negated equivalent nodal loads.
#[must_use]
pub fn fixed_end_forces_of(intensities: &[(f64, f64); 3], length: f64) -> ElementForces {
    let mut equivalent = [0.0; 6];

    let (p1, p2) = intensities[0];
    equivalent[0] += length * (2.0 * p1 + p2) / 6.0;
    equivalent[3] += length * (p1 + 2.0 * p2) / 6.0;

    let (w1, w2) = intensities[1];
    if w1 != 0.0 || w2 != 0.0 {
        let l2 = length * length;
        let (v_i, m_i, v_j, m_j) = if w1.abs() > w2.abs() {
            let ramp = w1 - w2;
            (
                w2 * length / 2.0 + 7.0 * ramp * length / 20.0,
                w2 * l2 / 12.0 + ramp * l2 / 20.0,
                w2 * length / 2.0 + 3.0 * ramp * length / 20.0,
                -w2 * l2 / 12.0 - ramp * l2 / 30.0,
            )
        } else {
            let ramp = w2 - w1;
            (
                w1 * length / 2.0 + 3.0 * ramp * length / 20.0,
                w1 * l2 / 12.0 + ramp * l2 / 30.0,
                w1 * length / 2.0 + 7.0 * ramp * length / 20.0,
                -w1 * l2 / 12.0 - ramp * l2 / 20.0,
            )
        };
        equivalent[1] += v_i;
        equivalent[2] += m_i;
        equivalent[4] += v_j;
        equivalent[5] += m_j;
    }

    let (m1, m2) = intensities[2];
    equivalent[1] -= (m1 + m2) / 2.0;
    equivalent[4] += (m1 + m2) / 2.0;
    equivalent[2] += length * (m1 - m2) / 12.0;
    equivalent[5] += length * (m2 - m1) / 12.0;

    -ElementForces::from(equivalent)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::member::{simple_supports, Support};
    use crate::section::SteelBeamSize;

    fn w12x16() -> SteelBeamSize {
        SteelBeamSize::new("W12X16", 103.0, 4.71, 16.0)
    }

    fn simple_beam(length: f64) -> Member {
        Member::new(length, &w12x16(), simple_supports(length)).expect("valid member")
    }

    #[test]
    fn default_discretisation_matches_expected_counts() {
        let model = BeamModel::new(simple_beam(240.0), DEFAULT_MAX_NODE_SPACING, true)
            .expect("valid spacing");
        assert_eq!(model.state(), AnalysisState::Ready);
        assert_eq!(model.points_of_interest(), &[0.0, 240.0]);
        assert_eq!(model.nodes().len(), 41);
        assert_eq!(model.elements().len(), 40);
        assert_eq!(model.dof_count(), 119);
        assert_eq!(model.global_stiffness().shape(), (119, 119));
        assert_eq!(model.nodal_load_vector().len(), 119);
        assert_eq!(model.local_stiffness().len(), 40);
        assert_eq!(model.support_nodes(), &[0, 40]);
        assert_eq!(model.dof_numbers()[0], [0, 0, 1]);
        assert_eq!(model.dof_numbers()[1], [2, 3, 4]);
    }

    #[test]
    fn uninitialized_model_is_empty() {
        let mut model = BeamModel::new(simple_beam(240.0), 12.0, false).expect("valid spacing");
        assert!(!model.is_ready());
        assert!(model.nodes().is_empty());
        assert_eq!(model.dof_count(), 0);
        assert_eq!(model.analyze(), Err(AnalysisError::NotInitialized));
        model.initialize();
        assert!(model.is_ready());
        assert_eq!(model.nodes().len(), 21);
    }

    #[test]
    fn invalid_spacing_is_rejected() {
        for spacing in [0.0, -6.0, f64::NAN, f64::INFINITY] {
            assert!(BeamModel::new(simple_beam(240.0), spacing, true).is_err());
        }
    }

    #[test]
    fn results_require_a_solution() {
        let model = BeamModel::new(simple_beam(240.0), 6.0, true).expect("valid spacing");
        assert_eq!(model.displacements().err(), Some(AnalysisError::NotSolved));
        assert_eq!(model.shear_diagram().err(), Some(AnalysisError::NotSolved));
        assert_eq!(model.moment_diagram().err(), Some(AnalysisError::NotSolved));
        assert_eq!(model.deflection_at(120.0).err(), Some(AnalysisError::NotSolved));
    }

    #[test]
    fn load_points_become_nodes() {
        let member = simple_beam(240.0)
            .with_point_loads(vec![PointLoad::new(100.0, [0.0, -1.0, 0.0]).expect("valid load")])
            .expect("in span")
            .with_dist_loads(vec![DistLoad::transverse((0.0, 10.0), -5.0, -5.0).expect("valid load")])
            .expect("in span");
        let model = BeamModel::new(member, 6.0, true).expect("valid spacing");
        assert_eq!(model.points_of_interest(), &[0.0, 10.0, 100.0, 240.0]);
        for point in model.points_of_interest() {
            assert!(model.nodes().iter().any(|node| node == point));
        }
        for pair in model.nodes().windows(2) {
            assert!(pair[1] - pair[0] <= 6.0 + 1.0e-9);
        }
    }

    #[test]
    fn global_stiffness_is_exactly_symmetric() {
        let supports = vec![
            Support::new(0.0, Restraint::FIXED),
            Support::new(97.3, Restraint::ROLLER),
            Support::new(240.0, Restraint::PINNED),
        ];
        let member = Member::new(240.0, &w12x16(), supports).expect("valid member");
        let model = BeamModel::new(member, 7.0, true).expect("valid spacing");
        let stiffness = model.global_stiffness();
        assert_eq!(stiffness, &stiffness.transpose());
    }

    #[test]
    fn uniform_fixed_end_forces() {
        let forces = fixed_end_forces_of(&[(0.0, 0.0), (-2.0, -2.0), (0.0, 0.0)], 12.0);
        assert_relative_eq!(forces[1], 12.0);
        assert_relative_eq!(forces[2], 24.0);
        assert_relative_eq!(forces[4], 12.0);
        assert_relative_eq!(forces[5], -24.0);
    }

    #[test]
    fn trapezoid_orientations_agree() {
        let forward = fixed_end_forces_of(&[(0.0, 0.0), (-3.0, -1.0), (0.0, 0.0)], 10.0);
        let mirrored = fixed_end_forces_of(&[(0.0, 0.0), (-1.0, -3.0), (0.0, 0.0)], 10.0);
        assert_relative_eq!(forward[1], mirrored[4], epsilon = 1.0e-12);
        assert_relative_eq!(forward[4], mirrored[1], epsilon = 1.0e-12);
        assert_relative_eq!(forward[2], -mirrored[5], epsilon = 1.0e-12);
        assert_relative_eq!(forward[1] + forward[4], 20.0, epsilon = 1.0e-12);
    }

    #[test]
    fn load_on_one_end_only_still_produces_fixed_end_forces() {
        let forces = fixed_end_forces_of(&[(0.0, 0.0), (0.0, -6.0), (0.0, 0.0)], 10.0);
        assert_relative_eq!(forces[1] + forces[4], 30.0, epsilon = 1.0e-12);
    }

    #[test]
    fn overlapping_loads_add() {
        let member = simple_beam(240.0)
            .with_dist_loads(vec![
                DistLoad::transverse((0.0, 240.0), -0.01, -0.01).expect("valid load"),
                DistLoad::transverse((0.0, 240.0), -0.02, -0.02).expect("valid load"),
            ])
            .expect("in span");
        let mut model = BeamModel::new(member, 6.0, true).expect("valid spacing");
        model.analyze().expect("solvable");
        let reactions = model.reactions_at_supports().expect("solved");
        assert_relative_eq!(reactions[0].transverse, 0.03 * 120.0, max_relative = 1.0e-9);
        assert_relative_eq!(reactions[1].transverse, 0.03 * 120.0, max_relative = 1.0e-9);
    }

    #[test]
    fn point_load_on_support_goes_to_reaction() {
        let member = simple_beam(240.0)
            .with_point_loads(vec![PointLoad::new(0.0, [0.0, -5.0, 0.0]).expect("valid load")])
            .expect("in span");
        let mut model = BeamModel::new(member, 6.0, true).expect("valid spacing");
        model.analyze().expect("solvable");
        let reactions = model.reactions_at_supports().expect("solved");
        assert_relative_eq!(reactions[0].transverse, 5.0, max_relative = 1.0e-9);
        assert_relative_eq!(reactions[1].transverse, 0.0, epsilon = 1.0e-9);
        assert!(model.displacements().expect("solved").amax() < 1.0e-9);
    }

    #[test]
    fn cantilever_tip_load() {
        let length = 120.0;
        let member = Member::new(length, &w12x16(), vec![Support::new(0.0, Restraint::FIXED)])
            .expect("valid member")
            .with_point_loads(vec![PointLoad::new(length, [0.0, -2.0, 0.0]).expect("valid load")])
            .expect("in span");
        let mut model = BeamModel::new(member, 12.0, true).expect("valid spacing");
        model.analyze().expect("solvable");
        let expected = -2.0 * length.powi(3) / (3.0 * 29_000.0 * 103.0);
        assert_relative_eq!(model.deflection_at(length).expect("solved"), expected, max_relative = 1.0e-9);
        let moments = model.moment_diagram().expect("solved");
        assert_relative_eq!(moments[0].1, -2.0 * length, max_relative = 1.0e-9);
        let reactions = model.reactions_at_supports().expect("solved");
        assert_relative_eq!(reactions[0].moment, 2.0 * length, max_relative = 1.0e-9);
    }

    #[test]
    fn rollers_alone_cannot_resist_axial_load() {
        for length in [100.0, 237.3] {
            let supports = vec![
                Support::new(0.0, Restraint::ROLLER),
                Support::new(length, Restraint::ROLLER),
            ];
            let member = Member::new(length, &w12x16(), supports)
                .expect("valid member")
                .with_point_loads(vec![
                    PointLoad::new(length / 2.0, [1.0, -5.0, 0.0]).expect("valid load")
                ])
                .expect("in span");
            let mut model = BeamModel::new(member, 6.0, true).expect("valid spacing");
            assert_eq!(model.analyze(), Err(AnalysisError::SingularStiffness));
            assert_eq!(model.state(), AnalysisState::Ready);
            assert_eq!(model.displacements(), Err(AnalysisError::NotSolved));
        }
    }

    #[test]
    fn interpolation_clamps_outside_series() {
        let series = [(0.0, 0.0), (10.0, -1.0), (20.0, 0.0)];
        assert_relative_eq!(interpolate(&series, 5.0), -0.5);
        assert_relative_eq!(interpolate(&series, -5.0), 0.0);
        assert_relative_eq!(interpolate(&series, 25.0), 0.0);
        assert_relative_eq!(interpolate(&[], 25.0), 0.0);
    }
}
