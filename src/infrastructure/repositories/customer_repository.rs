//! SeaORM implementation of CustomerRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::codec::{decode_date, encode_date};
use super::{delete_error, write_error};
use crate::domain::{
    Address, AddressInput, CreateCustomerInput, Customer, CustomerRepository, DomainError,
    UpdateCustomerInput,
};
use crate::models::address::{self, Entity as AddressEntity};
use crate::models::customer::{ActiveModel, Column, Entity as CustomerEntity, Model};

/// SeaORM-based implementation of CustomerRepository
pub struct SeaOrmCustomerRepository {
    db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(c: Model) -> Result<Customer, DomainError> {
    Ok(Customer {
        birth_date: c.birth_date.as_deref().map(decode_date).transpose()?,
        id: c.id,
        given_name: c.given_name,
        last_name: c.last_name,
        email: c.email,
        phone: c.phone,
        membership: c.membership,
    })
}

fn address_to_domain(a: address::Model) -> Address {
    Address {
        customer_id: a.customer_id,
        street: a.street,
        city: a.city,
    }
}

#[async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, DomainError> {
        CustomerEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError> {
        CustomerEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError> {
        CustomerEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn create(&self, input: CreateCustomerInput) -> Result<Customer, DomainError> {
        input.validate()?;

        let mut customer = ActiveModel {
            given_name: Set(input.given_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            birth_date: Set(input.birth_date.map(encode_date)),
            ..Default::default()
        };
        if let Some(membership) = input.membership {
            customer.membership = Set(membership);
        }

        let result = customer.insert(&self.db).await.map_err(|e| {
            let err = write_error(e);
            if let DomainError::Conflict(_) = &err {
                tracing::warn!("Customer email already registered");
            }
            err
        })?;
        tracing::debug!("Created customer {}", result.id);

        to_domain(result)
    }

    async fn update(&self, id: i32, input: UpdateCustomerInput) -> Result<Customer, DomainError> {
        input.validate()?;

        let existing = CustomerEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        if let Some(given_name) = input.given_name {
            active.given_name = Set(given_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(birth_date) = input.birth_date {
            active.birth_date = Set(birth_date.map(encode_date));
        }
        if let Some(membership) = input.membership {
            active.membership = Set(membership);
        }

        let result = active.update(&self.db).await.map_err(write_error)?;
        to_domain(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = CustomerEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| delete_error("customer", id, e))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        tracing::debug!("Deleted customer {}", id);
        Ok(())
    }

    async fn address(&self, customer_id: i32) -> Result<Option<Address>, DomainError> {
        let address = AddressEntity::find_by_id(customer_id).one(&self.db).await?;
        Ok(address.map(address_to_domain))
    }

    async fn set_address(
        &self,
        customer_id: i32,
        input: AddressInput,
    ) -> Result<Address, DomainError> {
        input.validate()?;

        if CustomerEntity::find_by_id(customer_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(DomainError::NotFound);
        }

        let existing = AddressEntity::find_by_id(customer_id).one(&self.db).await?;

        let result = match existing {
            Some(current) => {
                let mut active: address::ActiveModel = current.into();
                active.street = Set(input.street);
                active.city = Set(input.city);
                active.update(&self.db).await?
            }
            None => {
                let new_address = address::ActiveModel {
                    customer_id: Set(customer_id),
                    street: Set(input.street),
                    city: Set(input.city),
                };
                new_address.insert(&self.db).await.map_err(write_error)?
            }
        };

        Ok(address_to_domain(result))
    }

    async fn remove_address(&self, customer_id: i32) -> Result<(), DomainError> {
        let result = AddressEntity::delete_by_id(customer_id)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound);
        }

        Ok(())
    }
}
