use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::dog::DogRow;

/// Optional fields are stored as NULL when empty.
pub struct NewDog<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub breed: Option<&'a str>,
    pub age: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

/// `None` leaves a column untouched. A blank optional field clears the
/// column to NULL.
#[derive(Default)]
pub struct DogUpdate<'a> {
    pub name: Option<&'a str>,
    pub breed: Option<&'a str>,
    pub age: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

pub async fn list_dogs(pool: &PgPool, user_id: Uuid) -> Result<Vec<DogRow>, sqlx::Error> {
    sqlx::query_as::<_, DogRow>("SELECT * FROM dogs WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn get_dog(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<DogRow>, sqlx::Error> {
    sqlx::query_as::<_, DogRow>("SELECT * FROM dogs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_dog(pool: &PgPool, dog: NewDog<'_>) -> Result<DogRow, sqlx::Error> {
    let row = sqlx::query_as::<_, DogRow>(
        r#"
        INSERT INTO dogs (user_id, name, breed, age, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(dog.user_id)
    .bind(dog.name)
    .bind(non_empty(dog.breed))
    .bind(non_empty(dog.age))
    .bind(non_empty(dog.image_url))
    .fetch_one(pool)
    .await?;

    info!("Created dog {} for user {}", row.id, dog.user_id);
    Ok(row)
}

pub async fn update_dog(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    update: DogUpdate<'_>,
) -> Result<Option<DogRow>, sqlx::Error> {
    let mut query = sqlx::query_as::<_, DogRow>(
        r#"
        UPDATE dogs
        SET name = COALESCE($3, name),
            breed = CASE WHEN $4 THEN $5 ELSE breed END,
            age = CASE WHEN $6 THEN $7 ELSE age END,
            image_url = CASE WHEN $8 THEN $9 ELSE image_url END,
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(update.name);
    for field in [update.breed, update.age, update.image_url] {
        let (present, value) = patch_field(field);
        query = query.bind(present).bind(value);
    }
    query.fetch_optional(pool).await
}

/// Analyses of the dog go with it (`ON DELETE CASCADE`).
pub async fn delete_dog(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM dogs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() > 0 {
        info!("Deleted dog {id} for user {user_id}");
    }
    Ok(result.rows_affected() > 0)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Whether the column is written, and the value written to it.
fn patch_field(value: Option<&str>) -> (bool, Option<&str>) {
    (value.is_some(), non_empty(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_maps_blank_to_none() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("")), None);
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(Some(" Beagle ")), Some("Beagle"));
    }

    #[test]
    fn test_patch_field_blank_clears_and_absent_keeps() {
        assert_eq!(patch_field(None), (false, None));
        assert_eq!(patch_field(Some("")), (true, None));
        assert_eq!(patch_field(Some("  ")), (true, None));
        assert_eq!(patch_field(Some(" 3 years ")), (true, Some("3 years")));
    }
}
