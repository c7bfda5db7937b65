//! Spawn points: где актор появляется при respawn
//!
//! Spawn point = entity с EntityClass "SpawnPoint" + компонентом SpawnPoint.
//! Ссылка на spawn point не владеющая: ищем каждый раз заново.

use bevy::prelude::*;

pub const SPAWN_POINT_CLASS: &str = "SpawnPoint";

/// Имя класса entity (как в level data)
#[derive(Component, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct EntityClass(pub String);

impl EntityClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }
}

/// Spawner extension
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct SpawnPoint;

impl SpawnPoint {
    /// Переносит target в позицию и ориентацию spawn point
    pub fn spawn_entity(&self, spawn_transform: &Transform, target: &mut Transform) {
        target.translation = spawn_transform.translation;
        target.rotation = spawn_transform.rotation;
    }
}

/// Editor / game context host'а
///
/// В editor'е spawn selection не работает: актор стоит там, где его поставили.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct HostContext {
    pub editor: bool,
}

/// Первый подходящий spawn point (по возрастанию Entity)
///
/// Entity без SpawnPoint или с другим классом пропускаются.
pub fn select_spawn_point<'a, I>(candidates: I) -> Option<(Entity, &'a SpawnPoint, &'a Transform)>
where
    I: IntoIterator<Item = (Entity, &'a EntityClass, Option<&'a SpawnPoint>, &'a Transform)>,
{
    candidates
        .into_iter()
        .filter(|(_, class, _, _)| class.is(SPAWN_POINT_CLASS))
        .filter_map(|(entity, _, spawner, transform)| spawner.map(|s| (entity, s, transform)))
        .min_by_key(|(entity, _, _)| *entity)
}

/// Spawn helper для spawn point'а
pub fn spawn_spawn_point(commands: &mut Commands, transform: Transform) -> Entity {
    commands
        .spawn((EntityClass::new(SPAWN_POINT_CLASS), SpawnPoint, transform))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_picks_lowest_entity() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let c = world.spawn_empty().id();

        let spawn_class = EntityClass::new(SPAWN_POINT_CLASS);
        let other_class = EntityClass::new("Light");
        let spawner = SpawnPoint;
        let tf_a = Transform::from_xyz(1.0, 0.0, 0.0);
        let tf_b = Transform::from_xyz(2.0, 0.0, 0.0);
        let tf_c = Transform::from_xyz(3.0, 0.0, 0.0);

        // Порядок итерации не важен
        let candidates = vec![
            (c, &spawn_class, Some(&spawner), &tf_c),
            (a, &other_class, Some(&spawner), &tf_a),
            (b, &spawn_class, Some(&spawner), &tf_b),
        ];

        let (entity, _, transform) = select_spawn_point(candidates).unwrap();
        assert_eq!(entity, b);
        assert_eq!(transform.translation.x, 2.0);
    }

    #[test]
    fn test_class_without_extension_is_skipped() {
        let mut world = World::new();
        let a = world.spawn_empty().id();

        let class = EntityClass::new(SPAWN_POINT_CLASS);
        let tf = Transform::IDENTITY;

        assert!(select_spawn_point(vec![(a, &class, None, &tf)]).is_none());
        assert!(select_spawn_point(Vec::new()).is_none());
    }

    #[test]
    fn test_spawn_entity_copies_position_and_rotation() {
        let spawn = Transform::from_xyz(5.0, 6.0, 7.0).with_rotation(Quat::from_rotation_z(1.0));
        let mut target = Transform::from_xyz(0.0, 0.0, 0.0).with_scale(Vec3::splat(2.0));

        SpawnPoint.spawn_entity(&spawn, &mut target);
        assert_eq!(target.translation, Vec3::new(5.0, 6.0, 7.0));
        assert_eq!(target.rotation, spawn.rotation);
        assert_eq!(target.scale, Vec3::splat(2.0));
    }
}
