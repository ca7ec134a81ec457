use log::info;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::member::{Address, Member};
use crate::domain::ports::MemberRepository;

pub struct MemberService<R> {
    repo: R,
}

impl<R: MemberRepository> MemberService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a member. Names are unique.
    pub fn join(&self, name: String, address: Address) -> Result<Uuid, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput("member name must not be empty".into()));
        }
        if !self.repo.find_by_name(&name)?.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "member '{name}' already exists"
            )));
        }
        let member = Member {
            id: Uuid::new_v4(),
            name,
            address,
        };
        self.repo.save(&member)?;
        info!("member {} joined", member.id);
        Ok(member.id)
    }

    pub fn find_members(&self) -> Result<Vec<Member>, DomainError> {
        self.repo.find_all()
    }

    pub fn find_one(&self, id: Uuid) -> Result<Member, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("Member"))
    }
}
