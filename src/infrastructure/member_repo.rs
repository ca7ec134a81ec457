use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::member::Member;
use crate::domain::ports::MemberRepository;
use crate::schema::members;

use super::models::MemberRow;

pub struct DieselMemberRepository {
    pool: DbPool,
}

impl DieselMemberRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl MemberRepository for DieselMemberRepository {
    fn save(&self, member: &Member) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        let row = MemberRow::from(member);
        diesel::insert_into(members::table)
            .values(&row)
            .on_conflict(members::id)
            .do_update()
            .set((
                members::name.eq(&row.name),
                members::city.eq(&row.city),
                members::street.eq(&row.street),
                members::zipcode.eq(&row.zipcode),
            ))
            .execute(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    DomainError::InvalidInput(format!("member '{}' already exists", member.name))
                }
                other => other.into(),
            })?;
        Ok(())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Member>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = members::table
            .find(id)
            .select(MemberRow::as_select())
            .first::<MemberRow>(&mut conn)
            .optional()?;
        Ok(row.map(Member::from))
    }

    fn find_all(&self) -> Result<Vec<Member>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = members::table
            .select(MemberRow::as_select())
            .order(members::name.asc())
            .load::<MemberRow>(&mut conn)?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<Member>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = members::table
            .filter(members::name.eq(name))
            .select(MemberRow::as_select())
            .load::<MemberRow>(&mut conn)?;
        Ok(rows.into_iter().map(Member::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::DieselMemberRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::member::{Address, Member};
    use crate::domain::ports::MemberRepository;
    use crate::infrastructure::testing::setup_db;

    fn member(name: &str) -> Member {
        Member {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: Address::new("Seoul", "Saejeol", "123456"),
        }
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn save_and_find_by_id_roundtrip() {
        let (_container, pool) = setup_db().await;
        let repo = DieselMemberRepository::new(pool);
        let m = member("kim");

        repo.save(&m).expect("save failed");

        let found = repo.find_by_id(m.id).expect("find failed");
        assert_eq!(found, Some(m));
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn find_by_name_matches_exactly() {
        let (_container, pool) = setup_db().await;
        let repo = DieselMemberRepository::new(pool);
        repo.save(&member("kim")).expect("save failed");
        repo.save(&member("kimchi")).expect("save failed");

        let found = repo.find_by_name("kim").expect("find failed");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "kim");
        assert_eq!(repo.find_all().expect("find_all failed").len(), 2);
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn find_by_id_returns_none_for_unknown_id() {
        let (_container, pool) = setup_db().await;
        let repo = DieselMemberRepository::new(pool);

        assert!(repo.find_by_id(Uuid::new_v4()).expect("find failed").is_none());
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn duplicate_name_is_invalid_input() {
        let (_container, pool) = setup_db().await;
        let repo = DieselMemberRepository::new(pool);
        repo.save(&member("kim")).expect("save failed");

        let err = repo.save(&member("kim")).unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(repo.find_by_name("kim").expect("find failed").len(), 1);
    }
}
