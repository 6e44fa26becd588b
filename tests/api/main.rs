mod health_check;
mod subscribe;
