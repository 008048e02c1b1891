//! Fixture models for filtering tests.
//!
//! The `one_to_one` app: a `Place` may have one `Restaurant` (which uses the
//! place as its primary key), and a `Restaurant` has many `Waiter`s.

pub mod one_to_one {
    use std::sync::{Arc, LazyLock};

    use ufilter_db::fields::{FieldDef, FieldType, OnDelete};
    use ufilter_db::model::{Model, ModelMeta, RelatedObject, RelationKind};
    use ufilter_filters::{Filter, FilterKind, FilterSetClass, LookupType};

    /// `Place { id, name, address }`, reverse `restaurant`.
    pub struct Place;

    impl Model for Place {
        fn meta() -> &'static ModelMeta {
            static META: LazyLock<ModelMeta> = LazyLock::new(|| {
                ModelMeta::new("one_to_one", "place")
                    .field(FieldDef::new("id", FieldType::AutoField).primary_key())
                    .field(FieldDef::new("name", FieldType::CharField))
                    .field(FieldDef::new("address", FieldType::CharField))
                    .related_object(RelatedObject::new(
                        "restaurant",
                        "one_to_one.restaurant",
                        "place",
                        RelationKind::OneToOne,
                    ))
            });
            &META
        }
    }

    /// `Restaurant { place, serves_hot_dogs, serves_pizza }`, reverse `waiter_set`.
    pub struct Restaurant;

    impl Model for Restaurant {
        fn meta() -> &'static ModelMeta {
            static META: LazyLock<ModelMeta> = LazyLock::new(|| {
                ModelMeta::new("one_to_one", "restaurant")
                    .field(
                        FieldDef::new(
                            "place",
                            FieldType::OneToOneField {
                                to: "one_to_one.place".into(),
                                on_delete: OnDelete::Cascade,
                                related_name: None,
                            },
                        )
                        .primary_key(),
                    )
                    .field(FieldDef::new("serves_hot_dogs", FieldType::BooleanField))
                    .field(FieldDef::new("serves_pizza", FieldType::BooleanField))
                    .related_object(RelatedObject::new(
                        "waiter_set",
                        "one_to_one.waiter",
                        "restaurant",
                        RelationKind::ManyToOne,
                    ))
            });
            &META
        }
    }

    /// `Waiter { id, restaurant, name }`.
    pub struct Waiter;

    impl Model for Waiter {
        fn meta() -> &'static ModelMeta {
            static META: LazyLock<ModelMeta> = LazyLock::new(|| {
                ModelMeta::new("one_to_one", "waiter")
                    .field(FieldDef::new("id", FieldType::AutoField).primary_key())
                    .field(FieldDef::new(
                        "restaurant",
                        FieldType::ForeignKey {
                            to: "one_to_one.restaurant".into(),
                            on_delete: OnDelete::Cascade,
                            related_name: None,
                        },
                    ))
                    .field(FieldDef::new("name", FieldType::CharField))
            });
            &META
        }
    }

    /// A hand-declared filter set over [`Place`].
    #[derive(Debug)]
    pub struct PlaceFilterSet {
        filters: Vec<Filter>,
    }

    impl Default for PlaceFilterSet {
        fn default() -> Self {
            Self {
                filters: vec![
                    Filter::new("name", FilterKind::Text),
                    Filter::new("address", FilterKind::Text).lookups([
                        LookupType::Exact,
                        LookupType::IContains,
                    ]),
                    Filter::new("restaurant", FilterKind::Related),
                ],
            }
        }
    }

    impl FilterSetClass for PlaceFilterSet {
        fn model(&self) -> &'static ModelMeta {
            Place::meta()
        }

        fn filters(&self) -> &[Filter] {
            &self.filters
        }
    }

    /// A hand-declared filter set over [`Restaurant`].
    #[derive(Debug)]
    pub struct RestaurantFilterSet {
        filters: Vec<Filter>,
    }

    impl Default for RestaurantFilterSet {
        fn default() -> Self {
            Self {
                filters: vec![
                    Filter::new("serves_hot_dogs", FilterKind::Boolean),
                    Filter::new("serves_pizza", FilterKind::Boolean),
                ],
            }
        }
    }

    impl FilterSetClass for RestaurantFilterSet {
        fn model(&self) -> &'static ModelMeta {
            Restaurant::meta()
        }

        fn filters(&self) -> &[Filter] {
            &self.filters
        }
    }

    /// The shared [`PlaceFilterSet`]. Every call returns the same `Arc`.
    pub fn place_filter_set() -> Arc<dyn FilterSetClass> {
        static CLASS: LazyLock<Arc<dyn FilterSetClass>> =
            LazyLock::new(|| Arc::new(PlaceFilterSet::default()));
        Arc::clone(&CLASS)
    }

    /// The shared [`RestaurantFilterSet`].
    pub fn restaurant_filter_set() -> Arc<dyn FilterSetClass> {
        static CLASS: LazyLock<Arc<dyn FilterSetClass>> =
            LazyLock::new(|| Arc::new(RestaurantFilterSet::default()));
        Arc::clone(&CLASS)
    }
}

#[cfg(test)]
mod tests {
    use super::one_to_one::*;
    use std::sync::Arc;
    use ufilter_db::model::Model;

    #[test]
    fn test_place_fields() {
        assert_eq!(
            Place::meta().field_names(),
            vec!["id", "name", "address", "restaurant"]
        );
        assert_eq!(Restaurant::meta().pk_field().map(|f| f.name), Some("place"));
        assert_eq!(Waiter::meta().label(), "one_to_one.waiter");
    }

    #[test]
    fn test_shared_filter_sets() {
        assert!(Arc::ptr_eq(&place_filter_set(), &place_filter_set()));
        assert_eq!(place_filter_set().model(), Place::meta());
        assert_eq!(
            place_filter_set().declared_fields(),
            vec!["name", "address", "restaurant"]
        );
        assert_eq!(restaurant_filter_set().model(), Restaurant::meta());
    }
}
