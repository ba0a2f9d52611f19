use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::application::ports::bootcamp_repository::{
    BootcampPatch, BootcampRepository, ListBootcampsParams, NewBootcamp, SortOrder,
};
use crate::domain::bootcamps::{Bootcamp, Location};
use crate::infrastructure::db::PgPool;

const COLUMNS: &str = "id, user_id, name, slug, description, website, phone, email, \
     formatted_address, street, city, state, zipcode, country, lat, lng, careers, \
     housing, job_assistance, job_guarantee, accept_gi, average_rating, average_cost, \
     photo, created_at";

pub struct SqlxBootcampRepository {
    pub pool: PgPool,
}

impl SqlxBootcampRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(r: &sqlx::postgres::PgRow) -> Bootcamp {
    Bootcamp {
        id: r.get("id"),
        user_id: r.get("user_id"),
        name: r.get("name"),
        slug: r.get("slug"),
        description: r.get("description"),
        website: r.get("website"),
        phone: r.get("phone"),
        email: r.get("email"),
        location: Location {
            formatted_address: r.get("formatted_address"),
            street: r.get("street"),
            city: r.get("city"),
            state: r.get("state"),
            zipcode: r.get("zipcode"),
            country: r.get("country"),
            lat: r.get("lat"),
            lng: r.get("lng"),
        },
        careers: r.get("careers"),
        housing: r.get("housing"),
        job_assistance: r.get("job_assistance"),
        job_guarantee: r.get("job_guarantee"),
        accept_gi: r.get("accept_gi"),
        average_rating: r.get("average_rating"),
        average_cost: r.get("average_cost"),
        photo: r.get("photo"),
        created_at: r.get("created_at"),
    }
}

// Sort columns arrive pre-whitelisted from the use case; they are still
// interpolated only through this fixed mapping, never raw user input.
fn order_clause(sort: &[(String, SortOrder)]) -> String {
    let terms: Vec<String> = sort
        .iter()
        .map(|(col, order)| {
            let dir = match order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            };
            format!("{col} {dir}")
        })
        .collect();
    if terms.is_empty() {
        "created_at DESC".to_string()
    } else {
        terms.join(", ")
    }
}

#[async_trait]
impl BootcampRepository for SqlxBootcampRepository {
    async fn list(&self, params: &ListBootcampsParams) -> anyhow::Result<(Vec<Bootcamp>, i64)> {
        let mut where_clauses: Vec<String> = Vec::new();
        let mut idx = 0;
        if params.career.is_some() {
            idx += 1;
            where_clauses.push(format!("${idx} = ANY(careers)"));
        }
        if params.housing.is_some() {
            idx += 1;
            where_clauses.push(format!("housing = ${idx}"));
        }
        let where_sql = if where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_clauses.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM bootcamps{where_sql}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(c) = &params.career {
            count_q = count_q.bind(c);
        }
        if let Some(h) = params.housing {
            count_q = count_q.bind(h);
        }
        let total = count_q.fetch_one(&self.pool).await?;

        let list_sql = format!(
            "SELECT {COLUMNS} FROM bootcamps{where_sql} ORDER BY {} OFFSET ${} LIMIT ${}",
            order_clause(&params.sort),
            idx + 1,
            idx + 2,
        );
        let mut list_q = sqlx::query(&list_sql);
        if let Some(c) = &params.career {
            list_q = list_q.bind(c);
        }
        if let Some(h) = params.housing {
            list_q = list_q.bind(h);
        }
        let rows = list_q
            .bind(params.offset)
            .bind(params.limit)
            .fetch_all(&self.pool)
            .await?;
        Ok((rows.iter().map(map_row).collect(), total))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Bootcamp>> {
        let sql = format!("SELECT {COLUMNS} FROM bootcamps WHERE id = $1");
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(map_row))
    }

    async fn count_by_owner(&self, user_id: Uuid) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bootcamps WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    async fn create(&self, new: &NewBootcamp) -> anyhow::Result<Bootcamp> {
        let sql = format!(
            r#"INSERT INTO bootcamps
               (user_id, name, slug, description, website, phone, email, address,
                formatted_address, street, city, state, zipcode, country, lat, lng,
                careers, housing, job_assistance, job_guarantee, accept_gi, average_cost)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                       $15, $16, $17, $18, $19, $20, $21, $22)
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(new.user_id)
            .bind(&new.name)
            .bind(&new.slug)
            .bind(&new.description)
            .bind(&new.website)
            .bind(&new.phone)
            .bind(&new.email)
            .bind(&new.address)
            .bind(&new.location.formatted_address)
            .bind(&new.location.street)
            .bind(&new.location.city)
            .bind(&new.location.state)
            .bind(&new.location.zipcode)
            .bind(&new.location.country)
            .bind(new.location.lat)
            .bind(new.location.lng)
            .bind(&new.careers)
            .bind(new.housing)
            .bind(new.job_assistance)
            .bind(new.job_guarantee)
            .bind(new.accept_gi)
            .bind(new.average_cost)
            .fetch_one(&self.pool)
            .await?;
        Ok(map_row(&row))
    }

    async fn update(&self, id: Uuid, patch: &BootcampPatch) -> anyhow::Result<Option<Bootcamp>> {
        let sql = format!(
            r#"UPDATE bootcamps SET
                 name = COALESCE($2, name),
                 slug = COALESCE($3, slug),
                 description = COALESCE($4, description),
                 website = COALESCE($5, website),
                 phone = COALESCE($6, phone),
                 email = COALESCE($7, email),
                 careers = COALESCE($8, careers),
                 housing = COALESCE($9, housing),
                 job_assistance = COALESCE($10, job_assistance),
                 job_guarantee = COALESCE($11, job_guarantee),
                 accept_gi = COALESCE($12, accept_gi),
                 average_cost = COALESCE($13, average_cost)
               WHERE id = $1
               RETURNING {COLUMNS}"#
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.slug)
            .bind(&patch.description)
            .bind(&patch.website)
            .bind(&patch.phone)
            .bind(&patch.email)
            .bind(&patch.careers)
            .bind(patch.housing)
            .bind(patch.job_assistance)
            .bind(patch.job_guarantee)
            .bind(patch.accept_gi)
            .bind(patch.average_cost)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_row))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM bootcamps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_within_radius(
        &self,
        lat: f64,
        lng: f64,
        miles: f64,
    ) -> anyhow::Result<Vec<Bootcamp>> {
        // Haversine over an earth radius of 3963 miles, computed in SQL so
        // the filter runs server-side. least() clamps acos input against
        // floating point drift.
        let sql = format!(
            r#"SELECT {COLUMNS},
                 (3963.0 * acos(least(1.0,
                     cos(radians($1)) * cos(radians(lat)) * cos(radians(lng) - radians($2))
                     + sin(radians($1)) * sin(radians(lat))))) AS distance
               FROM bootcamps
               WHERE lat IS NOT NULL AND lng IS NOT NULL
                 AND (3963.0 * acos(least(1.0,
                     cos(radians($1)) * cos(radians(lat)) * cos(radians(lng) - radians($2))
                     + sin(radians($1)) * sin(radians(lat))))) <= $3
               ORDER BY distance ASC"#
        );
        let rows = sqlx::query(&sql)
            .bind(lat)
            .bind(lng)
            .bind(miles)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_row).collect())
    }

    async fn set_photo(&self, id: Uuid, filename: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("UPDATE bootcamps SET photo = $2 WHERE id = $1")
            .bind(id)
            .bind(filename)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
