//! Draw planning.
//!
//! [`plan_draws`] walks the renderable list in order and emits one
//! [`DrawCommand`] per object, marking where the pipeline or vertex buffer
//! actually changes. Objects are not reordered; callers that want fewer
//! binds sort their object list by material and mesh before planning.
//!
//! The planner is pure (names in, commands out) so batching behavior is
//! testable without a GPU.

/// One planned draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    /// Index into the renderable list; doubles as the storage buffer slot
    /// holding the object's transform.
    pub object_index: usize,
    /// Bind the object's material pipeline before drawing.
    pub bind_material: bool,
    /// Bind the object's vertex buffer before drawing.
    pub bind_mesh: bool,
}

/// Plans draw commands for a sequence of `(material, mesh)` name pairs.
///
/// The first object always binds both. After that a bind is emitted only
/// when the name differs from the previously bound one; material and mesh
/// are tracked independently, so two materials sharing a mesh rebind the
/// pipeline without touching the vertex buffer.
pub fn plan_draws<'a>(
    objects: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    let mut last_material: Option<&str> = None;
    let mut last_mesh: Option<&str> = None;

    for (object_index, (material, mesh)) in objects.into_iter().enumerate() {
        let bind_material = last_material != Some(material);
        let bind_mesh = last_mesh != Some(mesh);

        commands.push(DrawCommand {
            object_index,
            bind_material,
            bind_mesh,
        });

        last_material = Some(material);
        last_mesh = Some(mesh);
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binds(commands: &[DrawCommand]) -> (usize, usize) {
        (
            commands.iter().filter(|c| c.bind_material).count(),
            commands.iter().filter(|c| c.bind_mesh).count(),
        )
    }

    #[test]
    fn empty_input_plans_nothing() {
        assert!(plan_draws([]).is_empty());
    }

    #[test]
    fn first_object_always_binds_both() {
        let commands = plan_draws([("mat", "mesh")]);
        assert_eq!(
            commands,
            vec![DrawCommand {
                object_index: 0,
                bind_material: true,
                bind_mesh: true,
            }]
        );
    }

    #[test]
    fn identical_objects_bind_once() {
        let commands = plan_draws([("mat", "mesh"); 4]);
        assert_eq!(commands.len(), 4);
        assert_eq!(binds(&commands), (1, 1));
        for c in &commands[1..] {
            assert!(!c.bind_material && !c.bind_mesh);
        }
    }

    #[test]
    fn material_and_mesh_tracked_independently() {
        // Same mesh throughout; material alternates
        let commands = plan_draws([("a", "m"), ("b", "m"), ("a", "m")]);
        assert_eq!(binds(&commands), (3, 1));
        assert!(commands[1].bind_material);
        assert!(!commands[1].bind_mesh);
    }

    #[test]
    fn sorted_order_minimizes_binds() {
        let sorted = plan_draws([("a", "x"), ("a", "x"), ("b", "y"), ("b", "y")]);
        assert_eq!(binds(&sorted), (2, 2));

        let interleaved = plan_draws([("a", "x"), ("b", "y"), ("a", "x"), ("b", "y")]);
        assert_eq!(binds(&interleaved), (4, 4));
    }

    #[test]
    fn object_indices_follow_input_order() {
        let commands = plan_draws([("a", "x"), ("b", "y"), ("c", "z")]);
        let indices: Vec<usize> = commands.iter().map(|c| c.object_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn every_permutation_of_three_objects_draws_all_three() {
        let objects = [("a", "x"), ("b", "x"), ("a", "y")];
        let permutations = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for perm in permutations {
            let input: Vec<(&str, &str)> = perm.iter().map(|&i| objects[i]).collect();
            let commands = plan_draws(input);
            assert_eq!(commands.len(), 3);
            assert!(commands[0].bind_material && commands[0].bind_mesh);
        }
    }
}
